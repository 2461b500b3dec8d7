// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Store configuration.

/// Behavior switches for a [`PropertyStore`](crate::PropertyStore).
///
/// # Example
///
/// ```rust
/// use canopy_property::StoreOptionsBuilder;
///
/// let options = StoreOptionsBuilder::new()
///     .check_dynamic_seeds(false)
///     .skip_unchanged_commits(true)
///     .build();
///
/// assert!(!options.check_dynamic_seeds());
/// assert!(options.skip_unchanged_commits());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    check_dynamic_seeds: bool,
    skip_unchanged_commits: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            check_dynamic_seeds: true,
            skip_unchanged_commits: false,
        }
    }
}

impl StoreOptions {
    /// Returns whether the initial snapshot of a dynamic value (or selector
    /// result) is type checked like a plain value.
    #[must_use]
    #[inline]
    pub fn check_dynamic_seeds(&self) -> bool {
        self.check_dynamic_seeds
    }

    /// Returns whether committing a value equal to the current one leaves the
    /// name unmarked.
    #[must_use]
    #[inline]
    pub fn skip_unchanged_commits(&self) -> bool {
        self.skip_unchanged_commits
    }
}

/// Builder for [`StoreOptions`].
#[derive(Clone, Debug, Default)]
pub struct StoreOptionsBuilder {
    options: StoreOptions,
}

impl StoreOptionsBuilder {
    /// Creates a builder with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether dynamic seeds are type checked. Defaults to `true`.
    #[must_use]
    pub fn check_dynamic_seeds(mut self, check: bool) -> Self {
        self.options.check_dynamic_seeds = check;
        self
    }

    /// Sets whether equal commits are ignored for change tracking. Defaults to `false`.
    ///
    /// The value is still swapped in; only the change mark is skipped.
    #[must_use]
    pub fn skip_unchanged_commits(mut self, skip: bool) -> Self {
        self.options.skip_unchanged_commits = skip;
        self
    }

    /// Builds the options.
    #[must_use]
    pub fn build(self) -> StoreOptions {
        self.options
    }
}
