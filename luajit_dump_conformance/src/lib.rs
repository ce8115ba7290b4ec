// Copyright 2026 the LuaJIT Dump Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire-format conformance tests for `luajit_dump` live under `tests/`.
