// Copyright 2026 the Framepace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Win32 window and non-blocking message pump.
//!
//! [`Window`] registers a double-click-aware window class, creates one
//! window and implements [`EventSource`] over `PeekMessageW`. Double-clicks
//! are mapped to [`UiAction`]s by [`ActionBindings`]; the window procedure
//! only records the action, and the pump hands it to the frame loop on the
//! same poll, so the action runs outside the window procedure and between
//! frames.

use std::cell::Cell;

use framepace_core::capability::CompositionCapabilityReport;
use framepace_core::event::{EventSource, Pump, UiAction};
use framepace_core::probe::ProbeError;
use framepace_core::status::StatusCode;
use thiserror::Error;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CS_DBLCLKS, CS_HREDRAW, CS_VREDRAW, CreateWindowExW, DefWindowProcW, DestroyWindow,
    DispatchMessageW, IDC_ARROW, IsWindow, LoadCursorW, MB_OK, MSG, MessageBoxW, PM_REMOVE,
    PeekMessageW, PostQuitMessage, RegisterClassW, SW_SHOW, SetForegroundWindow, ShowWindow,
    TranslateMessage, UnregisterClassW, WINDOW_EX_STYLE, WINDOW_STYLE, WM_DESTROY,
    WM_LBUTTONDBLCLK, WM_QUIT, WM_RBUTTONDBLCLK, WNDCLASSW, WS_OVERLAPPEDWINDOW, WS_POPUP,
    WS_VISIBLE,
};
use windows_core::{HSTRING, PCWSTR, w};

use crate::status;

/// Title of the capability report message box.
const REPORT_CAPTION: PCWSTR = w!("CheckHWComposeSupport");

/// Outer window style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowStyle {
    /// Captioned, resizable top-level window.
    Overlapped,
    /// Borderless popup.
    Popup,
}

impl WindowStyle {
    fn to_win32(self) -> WINDOW_STYLE {
        match self {
            Self::Overlapped => WS_OVERLAPPEDWINDOW | WS_VISIBLE,
            Self::Popup => WS_POPUP | WS_VISIBLE,
        }
    }
}

/// Which double-click triggers which action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionBindings {
    /// Left-button double-click.
    pub left_double_click: Option<UiAction>,
    /// Right-button double-click.
    pub right_double_click: Option<UiAction>,
}

/// Window creation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    /// Window class name; also used as the title.
    pub class_name: &'static str,
    /// Left edge in screen pixels.
    pub x: i32,
    /// Top edge in screen pixels.
    pub y: i32,
    /// Outer width.
    pub width: u32,
    /// Outer height.
    pub height: u32,
    /// Window style.
    pub style: WindowStyle,
    /// Double-click mapping.
    pub bindings: ActionBindings,
}

/// A failure creating the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The module handle could not be obtained.
    #[error("failed to get module handle ({0})")]
    ModuleHandle(StatusCode),
    /// `RegisterClassW` failed.
    #[error("failed to register window class ({0})")]
    RegisterClass(StatusCode),
    /// `CreateWindowExW` failed.
    #[error("failed to create window ({0})")]
    Create(StatusCode),
    /// The requested size does not fit a Win32 coordinate.
    #[error("window size {width}x{height} out of range")]
    Size {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

thread_local! {
    static BINDINGS: Cell<ActionBindings> = const { Cell::new(ActionBindings {
        left_double_click: None,
        right_double_click: None,
    }) };
    static PENDING: Cell<Option<UiAction>> = const { Cell::new(None) };
}

/// A top-level window plus its message pump.
#[derive(Debug)]
pub struct Window {
    hwnd: HWND,
    instance: HINSTANCE,
    class: HSTRING,
}

impl Window {
    /// Registers the class and creates a visible window.
    ///
    /// Must be called on the thread that will pump messages.
    pub fn create(config: &WindowConfig) -> Result<Self, WindowError> {
        let size_error = WindowError::Size {
            width: config.width,
            height: config.height,
        };
        let width = i32::try_from(config.width).map_err(|_| size_error)?;
        let height = i32::try_from(config.height).map_err(|_| size_error)?;

        // SAFETY: querying the handle of the running executable.
        let instance: HINSTANCE = unsafe { GetModuleHandleW(None) }
            .map_err(|e| WindowError::ModuleHandle(status(&e)))?
            .into();
        let class = HSTRING::from(config.class_name);

        let wc = WNDCLASSW {
            style: CS_DBLCLKS | CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: instance,
            // SAFETY: loading a stock system cursor.
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }.unwrap_or_default(),
            lpszClassName: PCWSTR(class.as_ptr()),
            ..Default::default()
        };
        // SAFETY: `wc` and the class name outlive the call.
        if unsafe { RegisterClassW(&wc) } == 0 {
            return Err(WindowError::RegisterClass(status(
                &windows_core::Error::from_thread(),
            )));
        }

        BINDINGS.set(config.bindings);
        PENDING.set(None);

        // SAFETY: the class was registered above with this instance.
        let created = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                &class,
                &class,
                config.style.to_win32(),
                config.x,
                config.y,
                width,
                height,
                None,
                None,
                Some(instance),
                None,
            )
        };
        let hwnd = match created {
            Ok(hwnd) => hwnd,
            Err(err) => {
                // SAFETY: unregistering the class registered above.
                let _ = unsafe { UnregisterClassW(&class, Some(instance)) };
                return Err(WindowError::Create(status(&err)));
            }
        };

        // SAFETY: `hwnd` was just created on this thread.
        unsafe {
            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = UpdateWindow(hwnd);
            let _ = SetForegroundWindow(hwnd);
        }
        log::debug!("window {} created", config.class_name);

        Ok(Self {
            hwnd,
            instance,
            class,
        })
    }

    /// The native handle, for swap-chain creation.
    #[must_use]
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl EventSource for Window {
    fn pump(&mut self) -> Pump {
        let mut msg = MSG::default();
        // SAFETY: `msg` is a valid out-pointer; a null window filter also
        // returns thread messages such as WM_QUIT.
        if !unsafe { PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE) }.as_bool() {
            return Pump::Empty;
        }
        if msg.message == WM_QUIT {
            return Pump::Quit;
        }
        // SAFETY: dispatching a message retrieved above.
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        match PENDING.take() {
            Some(action) => Pump::Action(action),
            None => Pump::Dispatched,
        }
    }

    fn show_capability_report(&mut self, result: &Result<CompositionCapabilityReport, ProbeError>) {
        let text = HSTRING::from(report_text(result));
        // SAFETY: modal box owned by our window; it pumps its own messages.
        let _ = unsafe { MessageBoxW(Some(self.hwnd), &text, REPORT_CAPTION, MB_OK) };
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        // SAFETY: the handle and class belong to this object; a window that
        // was already destroyed by the user is skipped.
        unsafe {
            if IsWindow(Some(self.hwnd)).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
            let _ = UnregisterClassW(&self.class, Some(self.instance));
        }
    }
}

/// The message box text: the raw bitmask with its named flags, or `-1` when
/// the probe failed.
fn report_text(result: &Result<CompositionCapabilityReport, ProbeError>) -> String {
    match result {
        Ok(report) => report.to_string(),
        Err(_) => String::from("-1"),
    }
}

fn binding_for(msg: u32) -> Option<UiAction> {
    let bindings = BINDINGS.get();
    match msg {
        WM_LBUTTONDBLCLK => bindings.left_double_click,
        WM_RBUTTONDBLCLK => bindings.right_double_click,
        _ => None,
    }
}

unsafe extern "system" fn wnd_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_DESTROY => {
            // SAFETY: posts WM_QUIT to this thread's queue.
            unsafe { PostQuitMessage(0) };
            LRESULT(0)
        }
        WM_LBUTTONDBLCLK | WM_RBUTTONDBLCLK => {
            if let Some(action) = binding_for(msg) {
                PENDING.set(Some(action));
            }
            LRESULT(0)
        }
        // SAFETY: default handling for everything else.
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
