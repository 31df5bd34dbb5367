// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame pacing, presentation policy and timing capture for swap-chain
//! presentation experiments.
//!
//! `framepace_core` holds everything about the frame loop that does not
//! depend on a graphics API. It is `no_std` compatible (with `alloc`); the
//! platform pieces (clock, swap chain, capability probe, window) live in
//! backend crates and plug in through the traits defined here.
//!
//! # Architecture
//!
//! ```text
//!   EventSource::pump() ──► FramePacingScheduler::poll()
//!                                   │
//!               ┌───── event ───────┼──────── queue empty, interval elapsed ──┐
//!               ▼                   │                                          ▼
//!   UiAction ──► PresentationContext                              PayloadSource::payload()
//!   (fullscreen, probe)             │                                          │
//!                                   ▼                                          ▼
//!                         PresentationSurface  ◄──── clear, label, present(PresentRequest)
//!                                                                              │
//!                                                                              ▼
//!                                            FrameTimingSample ──► TimingRecorder
//! ```
//!
//! **[`scheduler`]**: Busy-polled loop that services OS events first and
//! starts a frame when the target interval has elapsed since the last one.
//!
//! **[`policy`]**: The two presentation policies (tearing-unlocked and
//! v-sync-locked) and the swap-chain and present parameters derived from
//! them.
//!
//! **[`surface`]**: The [`PresentationSurface`](surface::PresentationSurface)
//! trait that backends implement over a swap chain.
//!
//! **[`context`]**: Single owner of the surface and the capability probe,
//! with idempotent cleanup.
//!
//! **[`probe`]** and **[`capability`]**: The one-shot hardware composition
//! capability probe and its report.
//!
//! **[`record`]**: [`TimingRecorder`](record::TimingRecorder) sinks for frame
//! timing samples and loop events.
//!
//! **[`time`]** and **[`clock`]**: Tick-based host time and the clock
//! abstraction the loop reads.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod capability;
pub mod clock;
pub mod context;
pub mod event;
pub mod payload;
pub mod policy;
pub mod probe;
pub mod record;
pub mod scheduler;
pub mod status;
pub mod surface;
pub mod time;
pub mod timing;

#[cfg(test)]
mod testing;
