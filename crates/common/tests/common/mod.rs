//! Shared test utilities for workspace integration tests
#![allow(dead_code)]

use common::prelude::*;

/// A fresh in-memory workspace
pub fn memory_workspace() -> Workspace<MemoryWorkspaceProvider> {
    Workspace::new(MemoryWorkspaceProvider::new())
}
