// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport layer: authenticated HTTP (C1), TLS trust assembly, and the
//! line/SSE stream reader (C3).

pub mod http;
pub mod stream;
pub mod tls;

pub use http::Transport;
pub use stream::{read_stream, StreamOutcome, StreamRecord};
