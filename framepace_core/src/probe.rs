// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot hardware composition capability probe.
//!
//! The probe walks a fixed chain of driver objects:
//!
//! ```text
//! factory ──► adapter 0 ──► output 0 ──► capability-query interface ──► flags
//! ```
//!
//! Each hop is a trait implemented by the backend over its handle types.
//! Handles release themselves on drop, so a failure at any hop releases
//! everything acquired so far and a success releases the whole chain once
//! the flags have been copied out. Nothing acquired by the probe outlives
//! [`CapabilityProbe::probe`].
//!
//! Only adapter 0 and output 0 are queried. On multi-adapter or
//! multi-monitor systems the report covers the primary combination only.

use thiserror::Error;

use crate::capability::CompositionCapabilityReport;
use crate::status::StatusCode;

/// Index of the only adapter and output the probe looks at.
pub const PRIMARY_INDEX: u32 = 0;

/// Why a capability probe failed.
///
/// None of these are retried: they reflect a stable hardware or driver
/// limitation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The adapter-enumerating factory could not be created.
    #[error("failed to create adapter factory ({0})")]
    FactoryUnavailable(StatusCode),
    /// Adapter 0 could not be enumerated.
    #[error("no adapter at index 0 ({0})")]
    NoAdapter(StatusCode),
    /// Output 0 of the primary adapter could not be enumerated.
    #[error("primary adapter has no output at index 0 ({0})")]
    NoOutput(StatusCode),
    /// The output does not expose the capability-query interface.
    #[error("output does not expose the composition query interface ({0})")]
    UnsupportedInterface(StatusCode),
    /// The hardware composition query itself failed.
    #[error("hardware composition query failed ({0})")]
    QueryFailed(StatusCode),
}

impl ProbeError {
    /// The underlying status code.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match *self {
            Self::FactoryUnavailable(code)
            | Self::NoAdapter(code)
            | Self::NoOutput(code)
            | Self::UnsupportedInterface(code)
            | Self::QueryFailed(code) => code,
        }
    }
}

/// Produces a capability report on demand.
pub trait CapabilityProbe {
    /// Runs the probe once.
    fn probe(&self) -> Result<CompositionCapabilityReport, ProbeError>;
}

/// Creates the factory at the root of the chain.
pub trait FactorySource {
    /// Factory handle type.
    type Factory: AdapterFactory;

    /// Acquires a new factory.
    fn create_factory(&self) -> Result<Self::Factory, StatusCode>;
}

/// Enumerates adapters.
pub trait AdapterFactory {
    /// Adapter handle type.
    type Adapter: AdapterHandle;

    /// Enumerates the adapter at `index`.
    fn adapter(&self, index: u32) -> Result<Self::Adapter, StatusCode>;
}

/// Enumerates an adapter's outputs.
pub trait AdapterHandle {
    /// Output handle type.
    type Output: OutputHandle;

    /// Enumerates the output at `index`.
    fn output(&self, index: u32) -> Result<Self::Output, StatusCode>;
}

/// Upgrades an output to its capability-query interface.
pub trait OutputHandle {
    /// Capability-query handle type.
    type Query: CompositionQuery;

    /// Requests the extension interface.
    fn composition_query(&self) -> Result<Self::Query, StatusCode>;
}

/// Runs the hardware composition support query.
pub trait CompositionQuery {
    /// Returns the raw support bitmask.
    fn hardware_composition_support(&self) -> Result<u32, StatusCode>;
}

/// Probes adapter 0, output 0 of whatever `S` enumerates.
#[derive(Clone, Debug, Default)]
pub struct PrimaryOutputProbe<S> {
    source: S,
}

impl<S> PrimaryOutputProbe<S> {
    /// Wraps a factory source.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: FactorySource> CapabilityProbe for PrimaryOutputProbe<S> {
    fn probe(&self) -> Result<CompositionCapabilityReport, ProbeError> {
        let factory = self
            .source
            .create_factory()
            .map_err(ProbeError::FactoryUnavailable)?;
        let adapter = factory
            .adapter(PRIMARY_INDEX)
            .map_err(ProbeError::NoAdapter)?;
        let output = adapter
            .output(PRIMARY_INDEX)
            .map_err(ProbeError::NoOutput)?;
        let query = output
            .composition_query()
            .map_err(ProbeError::UnsupportedInterface)?;
        let raw = query
            .hardware_composition_support()
            .map_err(ProbeError::QueryFailed)?;
        Ok(CompositionCapabilityReport::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    const NOT_FOUND: StatusCode = StatusCode(0x887A_0002_u32 as i32);
    const NO_INTERFACE: StatusCode = StatusCode(0x8000_4002_u32 as i32);

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Where the mocked chain should break.
    #[derive(Clone, Copy, PartialEq)]
    enum Break {
        Nothing,
        Factory,
        Adapter,
        Output,
        Interface,
        Query,
    }

    struct Handle {
        name: &'static str,
        log: Log,
        fail: Break,
    }

    impl Handle {
        fn acquire(name: &'static str, log: &Log, fail: Break) -> Self {
            log.borrow_mut().push(name);
            Self {
                name,
                log: log.clone(),
                fail,
            }
        }

        fn next(&self, name: &'static str, breaks_at: Break) -> Result<Self, StatusCode> {
            if self.fail == breaks_at {
                return Err(if breaks_at == Break::Interface {
                    NO_INTERFACE
                } else {
                    NOT_FOUND
                });
            }
            Ok(Self::acquire(name, &self.log, self.fail))
        }
    }

    impl Drop for Handle {
        fn drop(&mut self) {
            self.log.borrow_mut().push(match self.name {
                "factory" => "~factory",
                "adapter" => "~adapter",
                "output" => "~output",
                _ => "~query",
            });
        }
    }

    impl AdapterFactory for Handle {
        type Adapter = Self;
        fn adapter(&self, index: u32) -> Result<Self, StatusCode> {
            assert_eq!(index, PRIMARY_INDEX, "only adapter 0 is enumerated");
            self.next("adapter", Break::Adapter)
        }
    }

    impl AdapterHandle for Handle {
        type Output = Self;
        fn output(&self, index: u32) -> Result<Self, StatusCode> {
            assert_eq!(index, PRIMARY_INDEX, "only output 0 is enumerated");
            self.next("output", Break::Output)
        }
    }

    impl OutputHandle for Handle {
        type Query = Self;
        fn composition_query(&self) -> Result<Self, StatusCode> {
            self.next("query", Break::Interface)
        }
    }

    impl CompositionQuery for Handle {
        fn hardware_composition_support(&self) -> Result<u32, StatusCode> {
            if self.fail == Break::Query {
                Err(StatusCode(0x8000_4005_u32 as i32))
            } else {
                Ok(0x1 | 0x2)
            }
        }
    }

    struct Source {
        log: Log,
        fail: Break,
    }

    impl FactorySource for Source {
        type Factory = Handle;
        fn create_factory(&self) -> Result<Handle, StatusCode> {
            if self.fail == Break::Factory {
                return Err(StatusCode(0x8000_4005_u32 as i32));
            }
            Ok(Handle::acquire("factory", &self.log, self.fail))
        }
    }

    fn run(fail: Break) -> (Result<CompositionCapabilityReport, ProbeError>, Vec<&'static str>) {
        let log: Log = Rc::default();
        let probe = PrimaryOutputProbe::new(Source {
            log: log.clone(),
            fail,
        });
        let result = probe.probe();
        let events = log.borrow().clone();
        (result, events)
    }

    fn assert_balanced(events: &[&'static str]) {
        let acquired = events.iter().filter(|e| !e.starts_with('~')).count();
        let released = events.iter().filter(|e| e.starts_with('~')).count();
        assert_eq!(acquired, released, "every handle released once: {events:?}");
    }

    #[test]
    fn success_releases_whole_chain_in_reverse() {
        let (result, events) = run(Break::Nothing);
        let report = result.unwrap();
        assert!(report.fullscreen() && report.windowed());
        assert!(!report.cursor_stretched());
        assert_eq!(
            events,
            [
                "factory", "adapter", "output", "query", "~query", "~output", "~adapter",
                "~factory"
            ]
        );
    }

    #[test]
    fn missing_output_reports_no_output_without_leaking_adapter() {
        let (result, events) = run(Break::Output);
        assert_eq!(result, Err(ProbeError::NoOutput(NOT_FOUND)));
        assert_eq!(events, ["factory", "adapter", "~adapter", "~factory"]);
    }

    #[test]
    fn every_failure_point_is_classified_and_balanced() {
        let cases = [
            (Break::Factory, "factory"),
            (Break::Adapter, "adapter"),
            (Break::Output, "output"),
            (Break::Interface, "interface"),
            (Break::Query, "query"),
        ];
        for (fail, name) in cases {
            let (result, events) = run(fail);
            let err = result.expect_err(name);
            let matches = match fail {
                Break::Factory => matches!(err, ProbeError::FactoryUnavailable(_)),
                Break::Adapter => matches!(err, ProbeError::NoAdapter(_)),
                Break::Output => matches!(err, ProbeError::NoOutput(_)),
                Break::Interface => err == ProbeError::UnsupportedInterface(NO_INTERFACE),
                Break::Query => matches!(err, ProbeError::QueryFailed(_)),
                Break::Nothing => false,
            };
            assert!(matches, "{name}: unexpected {err:?}");
            assert!(err.code().is_failure(), "{name}: code carried");
            assert_balanced(&events);
        }
    }

    #[test]
    fn repeated_probes_are_deterministic() {
        let (first, _) = run(Break::Nothing);
        let (second, _) = run(Break::Nothing);
        assert_eq!(first, second);
    }
}
