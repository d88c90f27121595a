// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level integration specs.
//!
//! These drive whole commands end to end through the public crate
//! surfaces: real processes and files on one side, fake peers and sinks
//! on the other.

mod prelude;

mod command {
    mod lifecycle;
    mod shell;
}

mod transfer {
    mod round_trip;
}

mod wire {
    mod updates;
}
