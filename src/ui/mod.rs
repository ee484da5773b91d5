// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the card composer.

pub mod canvas;
pub mod palette;
pub mod properties;
pub mod textures;
pub mod toolbar;
