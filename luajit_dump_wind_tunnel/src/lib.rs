// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Criterion benchmarks for the `luajit_dump` codec live under `benches/`.
