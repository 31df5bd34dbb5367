// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DXGI implementation of the composition capability probe chain.
//!
//! Each hop wraps a COM smart pointer. Dropping the wrapper releases the
//! interface, so the generic probe's scoping releases the chain in reverse
//! order of acquisition on every path.

use framepace_core::probe::{
    AdapterFactory, AdapterHandle, CompositionQuery, FactorySource, OutputHandle,
    PrimaryOutputProbe,
};
use framepace_core::status::StatusCode;
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, DXGI_CREATE_FACTORY_FLAGS, IDXGIAdapter1, IDXGIFactory1, IDXGIOutput,
    IDXGIOutput6,
};
use windows_core::Interface;

use crate::status;

/// The probe over adapter 0, output 0 of the system DXGI factory.
pub type DxgiProbe = PrimaryOutputProbe<DxgiFactorySource>;

/// Creates the hardware composition capability probe.
#[must_use]
pub const fn composition_probe() -> DxgiProbe {
    PrimaryOutputProbe::new(DxgiFactorySource)
}

/// Creates a fresh DXGI factory per probe.
#[derive(Clone, Copy, Debug, Default)]
pub struct DxgiFactorySource;

/// An owned `IDXGIFactory1`.
#[derive(Debug)]
pub struct DxgiFactory(IDXGIFactory1);

/// An owned `IDXGIAdapter1`.
#[derive(Debug)]
pub struct DxgiAdapter(IDXGIAdapter1);

/// An owned `IDXGIOutput`.
#[derive(Debug)]
pub struct DxgiOutput(IDXGIOutput);

/// An owned `IDXGIOutput6`.
#[derive(Debug)]
pub struct DxgiCompositionQuery(IDXGIOutput6);

impl FactorySource for DxgiFactorySource {
    type Factory = DxgiFactory;

    fn create_factory(&self) -> Result<DxgiFactory, StatusCode> {
        // SAFETY: plain factory creation with no debug flags.
        unsafe { CreateDXGIFactory2::<IDXGIFactory1>(DXGI_CREATE_FACTORY_FLAGS(0)) }
            .map(DxgiFactory)
            .map_err(|e| status(&e))
    }
}

impl AdapterFactory for DxgiFactory {
    type Adapter = DxgiAdapter;

    fn adapter(&self, index: u32) -> Result<DxgiAdapter, StatusCode> {
        // SAFETY: the factory is a live interface; out-of-range indices
        // return DXGI_ERROR_NOT_FOUND.
        unsafe { self.0.EnumAdapters1(index) }
            .map(DxgiAdapter)
            .map_err(|e| status(&e))
    }
}

impl AdapterHandle for DxgiAdapter {
    type Output = DxgiOutput;

    fn output(&self, index: u32) -> Result<DxgiOutput, StatusCode> {
        // SAFETY: as above, for outputs.
        unsafe { self.0.EnumOutputs(index) }
            .map(DxgiOutput)
            .map_err(|e| status(&e))
    }
}

impl OutputHandle for DxgiOutput {
    type Query = DxgiCompositionQuery;

    fn composition_query(&self) -> Result<DxgiCompositionQuery, StatusCode> {
        self.0
            .cast::<IDXGIOutput6>()
            .map(DxgiCompositionQuery)
            .map_err(|e| status(&e))
    }
}

impl CompositionQuery for DxgiCompositionQuery {
    fn hardware_composition_support(&self) -> Result<u32, StatusCode> {
        // SAFETY: the output is a live `IDXGIOutput6`.
        unsafe { self.0.CheckHardwareCompositionSupport() }.map_err(|e| status(&e))
    }
}
