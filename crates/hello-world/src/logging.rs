// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Console logging for the example.
//!
//! The filter follows the `RUST_LOG` conventions and is read from `GRAPHQL_VALIDATE_LOG`,
//! defaulting to warnings (which include the validate plugin's diagnostics).

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

const GRAPHQL_VALIDATE_LOG: &str = "GRAPHQL_VALIDATE_LOG";

pub fn init() {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(GRAPHQL_VALIDATE_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
