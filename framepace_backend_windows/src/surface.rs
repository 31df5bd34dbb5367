// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct3D 11 flip-model swap chain.
//!
//! [`D3D11Surface`] owns the device, its immediate context, the swap chain,
//! the current render target view and, once a label has been drawn, the
//! Direct2D text overlay. Everything is created from a
//! [`SurfaceConfig`], so the swap-chain flags and the present arguments
//! always come from the same [`PresentationPolicy`].
//!
//! Teardown order is fixed: overlay, render target view, device context,
//! device, then the swap chain after it has been forced out of fullscreen.

use framepace_core::policy::{PresentRequest, PresentationPolicy};
use framepace_core::status::StatusCode;
use framepace_core::surface::{
    Label, PresentError, PresentOutcome, PresentationSurface, Rgba, SurfaceConfig, SurfaceError,
};
use windows::Win32::Foundation::{HMODULE, HWND};
use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
use windows::Win32::Graphics::Direct3D11::{
    D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_SDK_VERSION, D3D11CreateDeviceAndSwapChain,
    ID3D11Device, ID3D11DeviceContext, ID3D11RenderTargetView, ID3D11Texture2D,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_FORMAT_R8G8B8A8_UNORM, DXGI_FORMAT_UNKNOWN, DXGI_MODE_DESC, DXGI_RATIONAL,
    DXGI_SAMPLE_DESC,
};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory2, DXGI_CREATE_FACTORY_FLAGS, DXGI_ERROR_DEVICE_REMOVED,
    DXGI_ERROR_DEVICE_RESET, DXGI_FEATURE_PRESENT_ALLOW_TEARING, DXGI_PRESENT,
    DXGI_PRESENT_ALLOW_TEARING, DXGI_STATUS_OCCLUDED, DXGI_SWAP_CHAIN_DESC,
    DXGI_SWAP_CHAIN_FLAG, DXGI_SWAP_CHAIN_FLAG_ALLOW_TEARING, DXGI_SWAP_EFFECT_FLIP_DISCARD,
    DXGI_USAGE, DXGI_USAGE_BACK_BUFFER, DXGI_USAGE_RENDER_TARGET_OUTPUT, IDXGIFactory5,
    IDXGISwapChain,
};
use windows_core::{BOOL, HRESULT};

use crate::overlay::TextOverlay;
use crate::status;

/// A Direct3D 11 swap chain bound to one window.
#[derive(Debug)]
pub struct D3D11Surface {
    config: SurfaceConfig,
    swap_flags: DXGI_SWAP_CHAIN_FLAG,
    fullscreen: bool,
    resources: Option<Resources>,
}

#[derive(Debug)]
struct Resources {
    overlay: Option<TextOverlay>,
    view: Option<ID3D11RenderTargetView>,
    context: ID3D11DeviceContext,
    device: ID3D11Device,
    swap_chain: IDXGISwapChain,
}

impl Resources {
    fn release(self) {
        let Self {
            overlay,
            view,
            context,
            device,
            swap_chain,
        } = self;
        drop(overlay);
        drop(view);
        // SAFETY: the context is live; unbinding avoids deferred destruction
        // of the view we just dropped.
        unsafe { context.ClearState() };
        drop(context);
        drop(device);
        // SAFETY: a swap chain must not be released while fullscreen. Failure
        // here is ignored; teardown continues regardless.
        let _ = unsafe { swap_chain.SetFullscreenState(false, None) };
        drop(swap_chain);
    }

    fn rebuild_view(&mut self) -> Result<(), SurfaceError> {
        // SAFETY: buffer 0 is the current back buffer of a live swap chain.
        let buffer: ID3D11Texture2D = unsafe { self.swap_chain.GetBuffer(0) }
            .map_err(|e| creation("back buffer", &e))?;
        let mut view = None;
        // SAFETY: `buffer` belongs to this device; `view` is a valid
        // out-pointer.
        unsafe { self.device.CreateRenderTargetView(&buffer, None, Some(&mut view)) }
            .map_err(|e| creation("render target view", &e))?;
        self.view = view;
        Ok(())
    }
}

fn creation(stage: &'static str, err: &windows_core::Error) -> SurfaceError {
    SurfaceError::Creation {
        stage,
        code: status(err),
    }
}

impl D3D11Surface {
    /// Creates the device and swap chain for `window`.
    ///
    /// Fails with [`SurfaceError::TearingUnsupported`] when a tearing
    /// configuration is requested on a system that cannot present with
    /// tearing, and with [`SurfaceError::PolicyMismatch`] for a configuration
    /// whose swap flags and present arguments disagree.
    pub fn create(window: HWND, config: SurfaceConfig) -> Result<Self, SurfaceError> {
        config.validate()?;
        if config.allow_tearing && !tearing_supported() {
            return Err(SurfaceError::TearingUnsupported);
        }

        let swap_flags = if config.allow_tearing {
            DXGI_SWAP_CHAIN_FLAG_ALLOW_TEARING
        } else {
            DXGI_SWAP_CHAIN_FLAG(0)
        };
        let refresh = config.refresh_hint.map_or(
            DXGI_RATIONAL::default(),
            |r| DXGI_RATIONAL {
                Numerator: r.numerator,
                Denominator: r.denominator,
            },
        );
        let desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: config.width,
                Height: config.height,
                RefreshRate: refresh,
                Format: DXGI_FORMAT_R8G8B8A8_UNORM,
                ..Default::default()
            },
            SampleDesc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            BufferUsage: DXGI_USAGE(DXGI_USAGE_RENDER_TARGET_OUTPUT.0 | DXGI_USAGE_BACK_BUFFER.0),
            BufferCount: config.buffer_count,
            OutputWindow: window,
            Windowed: true.into(),
            SwapEffect: DXGI_SWAP_EFFECT_FLIP_DISCARD,
            Flags: swap_flags.0 as u32,
        };

        let mut swap_chain = None;
        let mut device = None;
        let mut context = None;
        // SAFETY: `desc` and the out-pointers live for the duration of the
        // call.
        unsafe {
            D3D11CreateDeviceAndSwapChain(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                HMODULE::default(),
                D3D11_CREATE_DEVICE_BGRA_SUPPORT,
                None,
                D3D11_SDK_VERSION,
                Some(&desc),
                Some(&mut swap_chain),
                Some(&mut device),
                None,
                Some(&mut context),
            )
        }
        .map_err(|e| creation("device and swap chain", &e))?;

        let missing = || SurfaceError::Creation {
            stage: "device and swap chain",
            code: StatusCode::default(),
        };
        let mut resources = Resources {
            overlay: None,
            view: None,
            context: context.ok_or_else(missing)?,
            device: device.ok_or_else(missing)?,
            swap_chain: swap_chain.ok_or_else(missing)?,
        };
        if let Err(err) = resources.rebuild_view() {
            resources.release();
            return Err(err);
        }

        log::info!(
            "{} swap chain {}x{}, {} buffers",
            config.policy,
            config.width,
            config.height,
            config.buffer_count,
        );
        Ok(Self {
            config,
            swap_flags,
            fullscreen: false,
            resources: Some(resources),
        })
    }

    /// The configuration the surface was created with.
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn resources(&mut self) -> Result<&mut Resources, SurfaceError> {
        self.resources.as_mut().ok_or(SurfaceError::Released)
    }

    fn resize_for_mode(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        let flags = self.swap_flags;
        let res = self.resources()?;
        // Every reference to the old back buffers goes before the resize.
        res.overlay = None;
        res.view = None;
        // SAFETY: live context; the state cleared only references the views
        // dropped above.
        unsafe {
            res.context.ClearState();
            res.context.Flush();
        }

        // SAFETY: no present is in flight; the caller runs between frames.
        let transition = unsafe { res.swap_chain.SetFullscreenState(fullscreen, None) }
            .map_err(|e| SurfaceError::Fullscreen(status(&e)));
        // SAFETY: no outstanding buffer references remain.
        let resize = unsafe {
            res.swap_chain
                .ResizeBuffers(0, 0, 0, DXGI_FORMAT_UNKNOWN, flags)
        }
        .map_err(|e| creation("resized back buffers", &e));
        let rebuild = res.rebuild_view();

        transition?;
        resize?;
        rebuild
    }
}

impl PresentationSurface for D3D11Surface {
    fn policy(&self) -> PresentationPolicy {
        self.config.policy
    }

    fn clear(&mut self, color: Rgba) -> Result<(), SurfaceError> {
        let res = self.resources()?;
        let view = res.view.as_ref().ok_or(SurfaceError::Draw(StatusCode::default()))?;
        // SAFETY: live context and view.
        unsafe {
            res.context
                .OMSetRenderTargets(Some(&[Some(view.clone())]), None);
            res.context.ClearRenderTargetView(view, &color);
        }
        Ok(())
    }

    fn draw_label(&mut self, label: &Label<'_>) -> Result<(), SurfaceError> {
        let res = self.resources()?;
        if res.overlay.is_none() {
            let overlay =
                TextOverlay::new(&res.swap_chain).map_err(|e| creation("text overlay", &e))?;
            res.overlay = Some(overlay);
        }
        match res.overlay.as_mut() {
            Some(overlay) => overlay
                .draw(label)
                .map_err(|e| SurfaceError::Draw(status(&e))),
            None => Ok(()),
        }
    }

    fn present(&mut self, request: PresentRequest) -> Result<PresentOutcome, PresentError> {
        let policy = self.config.policy;
        if !request.is_valid_for(policy) {
            return Err(PresentError::PolicyViolation { policy, request });
        }
        let res = self.resources.as_ref().ok_or(PresentError::Released)?;
        let flags = if request.allow_tearing {
            DXGI_PRESENT_ALLOW_TEARING
        } else {
            DXGI_PRESENT(0)
        };
        // SAFETY: live swap chain; flags match its creation flags.
        let hr = unsafe { res.swap_chain.Present(request.sync_interval, flags) };
        let outcome = classify(hr);
        if let Err(err) = &outcome
            && err.is_fatal()
        {
            // SAFETY: live device; the reason is only read for the log.
            let reason = unsafe { res.device.GetDeviceRemovedReason() };
            log::error!("device lost ({err}), removal reason: {reason:?}");
        }
        outcome
    }

    fn is_fullscreen(&self) -> bool {
        let Some(res) = self.resources.as_ref() else {
            return false;
        };
        let mut state = BOOL::default();
        // SAFETY: live swap chain; `state` is a valid out-pointer and the
        // target output is not requested.
        let query = unsafe { res.swap_chain.GetFullscreenState(Some(&raw mut state), None) };
        live_fullscreen(query.map(|()| state), self.fullscreen)
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        self.resize_for_mode(fullscreen)?;
        self.fullscreen = fullscreen;
        Ok(())
    }

    fn release(&mut self) {
        if let Some(resources) = self.resources.take() {
            resources.release();
            self.fullscreen = false;
            log::debug!("{} surface released", self.config.policy);
        }
    }
}

impl Drop for D3D11Surface {
    fn drop(&mut self) {
        self.release();
    }
}

/// Maps a present result to the loop's three classes: shown or occluded,
/// transient failure, or device loss.
fn classify(hr: HRESULT) -> Result<PresentOutcome, PresentError> {
    if hr == DXGI_STATUS_OCCLUDED {
        return Ok(PresentOutcome::Occluded);
    }
    if hr.is_ok() {
        return Ok(PresentOutcome::Presented);
    }
    let code = StatusCode(hr.0);
    if hr == DXGI_ERROR_DEVICE_REMOVED {
        Err(PresentError::DeviceRemoved(code))
    } else if hr == DXGI_ERROR_DEVICE_RESET {
        Err(PresentError::DeviceReset(code))
    } else {
        Err(PresentError::Failed(code))
    }
}

/// DXGI can leave exclusive fullscreen on its own (Alt+Tab, focus loss), so
/// the swap chain's answer wins over the last state we set.
fn live_fullscreen(query: windows_core::Result<BOOL>, last_set: bool) -> bool {
    match query {
        Ok(state) => state.as_bool(),
        Err(err) => {
            log::debug!("fullscreen state query failed ({}), using last set state", status(&err));
            last_set
        }
    }
}

/// Whether the OS and driver can present with tearing.
#[expect(clippy::cast_possible_truncation, reason = "BOOL is four bytes")]
fn tearing_supported() -> bool {
    // SAFETY: factory creation plus a feature query into a local BOOL.
    unsafe {
        let Ok(factory) = CreateDXGIFactory2::<IDXGIFactory5>(DXGI_CREATE_FACTORY_FLAGS(0)) else {
            return false;
        };
        let mut allow = BOOL::default();
        factory
            .CheckFeatureSupport(
                DXGI_FEATURE_PRESENT_ALLOW_TEARING,
                (&raw mut allow).cast(),
                size_of::<BOOL>() as u32,
            )
            .is_ok()
            && allow.as_bool()
    }
}
