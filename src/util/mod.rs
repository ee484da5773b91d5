// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometry and display-scaling helpers.

pub mod geometry;
pub mod viewport;
