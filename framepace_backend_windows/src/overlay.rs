// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct2D/DirectWrite text drawn straight into the swap chain's back
//! buffer.
//!
//! The render target wraps the DXGI surface of buffer 0, so it holds a
//! reference to the swap chain's buffers and must be dropped before the
//! buffers are resized.

use framepace_core::surface::Label;
use windows::Win32::Graphics::Direct2D::Common::{
    D2D_RECT_F, D2D1_ALPHA_MODE_PREMULTIPLIED, D2D1_COLOR_F, D2D1_PIXEL_FORMAT,
};
use windows::Win32::Graphics::Direct2D::{
    D2D1_DRAW_TEXT_OPTIONS_NONE, D2D1_FACTORY_TYPE_SINGLE_THREADED, D2D1_RENDER_TARGET_PROPERTIES,
    D2D1_RENDER_TARGET_TYPE_DEFAULT, D2D1CreateFactory, ID2D1Factory, ID2D1RenderTarget,
    ID2D1SolidColorBrush,
};
use windows::Win32::Graphics::DirectWrite::{
    DWRITE_FACTORY_TYPE_SHARED, DWRITE_FONT_STRETCH_NORMAL, DWRITE_FONT_STYLE_NORMAL,
    DWRITE_FONT_WEIGHT_NORMAL, DWRITE_MEASURING_MODE_NATURAL, DWRITE_PARAGRAPH_ALIGNMENT_CENTER,
    DWRITE_TEXT_ALIGNMENT_CENTER, DWriteCreateFactory, IDWriteFactory, IDWriteTextFormat,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT_UNKNOWN;
use windows::Win32::Graphics::Dxgi::{IDXGISurface, IDXGISwapChain};
use windows_core::{Result, w};

const FONT_SIZE: f32 = 64.0;

const WHITE: D2D1_COLOR_F = D2D1_COLOR_F {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Centered white text over the back buffer.
#[derive(Debug)]
pub(crate) struct TextOverlay {
    // Field order is release order: brush and format before the target,
    // the target before its factory.
    brush: ID2D1SolidColorBrush,
    format: IDWriteTextFormat,
    target: ID2D1RenderTarget,
    _factory: ID2D1Factory,
    text: Vec<u16>,
}

impl TextOverlay {
    pub(crate) fn new(swap_chain: &IDXGISwapChain) -> Result<Self> {
        // SAFETY: all calls operate on live interfaces created right here or
        // on the caller's swap chain; out-pointers are managed by windows-rs.
        unsafe {
            let factory: ID2D1Factory = D2D1CreateFactory(D2D1_FACTORY_TYPE_SINGLE_THREADED, None)?;
            let surface: IDXGISurface = swap_chain.GetBuffer(0)?;
            let props = D2D1_RENDER_TARGET_PROPERTIES {
                r#type: D2D1_RENDER_TARGET_TYPE_DEFAULT,
                pixelFormat: D2D1_PIXEL_FORMAT {
                    format: DXGI_FORMAT_UNKNOWN,
                    alphaMode: D2D1_ALPHA_MODE_PREMULTIPLIED,
                },
                ..Default::default()
            };
            let target = factory.CreateDxgiSurfaceRenderTarget(&surface, &props)?;
            let brush = target.CreateSolidColorBrush(&WHITE, None)?;

            let dwrite: IDWriteFactory = DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED)?;
            let format = dwrite.CreateTextFormat(
                w!("Arial"),
                None,
                DWRITE_FONT_WEIGHT_NORMAL,
                DWRITE_FONT_STYLE_NORMAL,
                DWRITE_FONT_STRETCH_NORMAL,
                FONT_SIZE,
                w!("en-us"),
            )?;
            format.SetTextAlignment(DWRITE_TEXT_ALIGNMENT_CENTER)?;
            format.SetParagraphAlignment(DWRITE_PARAGRAPH_ALIGNMENT_CENTER)?;

            Ok(Self {
                brush,
                format,
                target,
                _factory: factory,
                text: Vec::new(),
            })
        }
    }

    /// Draws `label` centered in its box.
    pub(crate) fn draw(&mut self, label: &Label<'_>) -> Result<()> {
        self.text.clear();
        self.text.extend(label.text.encode_utf16());
        let rect = to_d2d_rect(label.rect);
        // SAFETY: BeginDraw/EndDraw bracket a single DrawText on a live
        // target; the UTF-16 buffer outlives the call.
        unsafe {
            self.target.BeginDraw();
            self.target.DrawText(
                &self.text,
                &self.format,
                &rect,
                &self.brush,
                D2D1_DRAW_TEXT_OPTIONS_NONE,
                DWRITE_MEASURING_MODE_NATURAL,
            );
            self.target.EndDraw(None, None)
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "window pixel coordinates fit f32"
)]
fn to_d2d_rect(rect: kurbo::Rect) -> D2D_RECT_F {
    D2D_RECT_F {
        left: rect.x0 as f32,
        top: rect.y0 as f32,
        right: rect.x1 as f32,
        bottom: rect.y1 as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_copied_edge_for_edge() {
        let rect = to_d2d_rect(kurbo::Rect::new(50.0, 50.0, 650.0, 300.0));
        assert_eq!(
            (rect.left, rect.top, rect.right, rect.bottom),
            (50.0, 50.0, 650.0, 300.0)
        );
    }
}
