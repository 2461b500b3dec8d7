// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in node types.

mod group;
mod patch;
mod shader;

pub use group::GroupNode;
pub use patch::PatchNode;
pub use shader::{ColorShaderNode, LinearGradientNode, parse_tile_mode};
