// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path).unwrap();

    let vars = [
        ("AGENT_CONSOLE_CONFIG", "AGENT_CONSOLE_CONFIG"),
        ("AGENT_CONSOLE_URL", "AGENT_CONSOLE_URL"),
        ("AGENT_CONSOLE_CAPACITY", "AGENT_CONSOLE_CAPACITY"),
        ("AGENT_CONSOLE_LOG", "AGENT_CONSOLE_LOG"),
        ("XDG_CONFIG_HOME", "XDG_CONFIG_HOME"),
        ("HOME", "HOME"),
    ];

    for (const_name, env_name) in vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";").unwrap();
    }
    println!("cargo:rerun-if-changed=build.rs");
}
