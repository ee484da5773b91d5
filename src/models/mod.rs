// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Card data model: catalog, elements and the layered scene.

pub mod catalog;
pub mod element;
pub mod scene;
