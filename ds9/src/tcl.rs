//! The slice of the Tcl/Tk C API the host drives, and its `Host`/`Interpreter` bindings.
#![allow(non_camel_case_types, non_snake_case)]

use ds9_boot::{Host, InterpError, Interpreter};
use ds9_core::ProcessSlot;
use libc::{c_char, c_int, c_void};
use std::borrow::Cow;
use std::ffi::{CStr, CString, OsStr, OsString};
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

#[repr(C)]
pub struct Tcl_Interp {
    _private: [u8; 0],
}

#[repr(C)]
pub struct Tcl_Obj {
    _private: [u8; 0],
}

pub const TCL_OK: c_int = 0;

const TCL_DSTRING_STATIC_SIZE: usize = 200;

/// Opaque encoding token; NULL selects the system encoding.
pub type Tcl_Encoding = *mut c_void;

#[repr(C)]
pub struct Tcl_DString {
    pub string: *mut c_char,
    pub length: c_int,
    pub space_avl: c_int,
    pub static_space: [c_char; TCL_DSTRING_STATIC_SIZE],
}

impl Tcl_DString {
    fn empty() -> Self {
        Self {
            string: ptr::null_mut(),
            length: 0,
            space_avl: 0,
            static_space: [0; TCL_DSTRING_STATIC_SIZE],
        }
    }
}

type DStringConversion =
    unsafe extern "C" fn(Tcl_Encoding, *const c_char, c_int, *mut Tcl_DString) -> *mut c_char;

/// `Tcl_PackageInitProc` / `Tcl_AppInitProc`.
pub type TclInitProc = unsafe extern "C" fn(*mut Tcl_Interp) -> c_int;

extern "C" {
    pub fn Tcl_FindExecutable(argv0: *const c_char);
    pub fn Tcl_GetNameOfExecutable() -> *const c_char;
    pub fn Tcl_ExternalToUtfDString(
        encoding: Tcl_Encoding,
        src: *const c_char,
        src_len: c_int,
        ds: *mut Tcl_DString,
    ) -> *mut c_char;
    pub fn Tcl_UtfToExternalDString(
        encoding: Tcl_Encoding,
        src: *const c_char,
        src_len: c_int,
        ds: *mut Tcl_DString,
    ) -> *mut c_char;
    pub fn Tcl_DStringFree(ds: *mut Tcl_DString);
    pub fn Tcl_CreateInterp() -> *mut Tcl_Interp;
    pub fn Tcl_Init(interp: *mut Tcl_Interp) -> c_int;
    pub fn Tcl_GetStringResult(interp: *mut Tcl_Interp) -> *const c_char;
    pub fn Tcl_NewStringObj(bytes: *const c_char, length: c_int) -> *mut Tcl_Obj;
    pub fn Tcl_SetStartupScript(path: *mut Tcl_Obj, encoding: *const c_char);
    pub fn Tcl_StaticPackage(
        interp: *mut Tcl_Interp,
        name: *const c_char,
        init: Option<TclInitProc>,
        safe_init: Option<TclInitProc>,
    );
    pub fn Tcl_Exit(status: c_int) -> !;

    pub fn TclZipfs_Init(interp: *mut Tcl_Interp) -> c_int;
    pub fn TclZipfs_Mount(
        interp: *mut Tcl_Interp,
        mount_point: *const c_char,
        zipname: *const c_char,
        passwd: *const c_char,
    ) -> c_int;

    pub fn Tk_Init(interp: *mut Tcl_Interp) -> c_int;
    pub fn Tk_SafeInit(interp: *mut Tcl_Interp) -> c_int;
    pub fn Tk_MainEx(
        argc: c_int,
        argv: *mut *mut c_char,
        app_init: TclInitProc,
        interp: *mut Tcl_Interp,
    );
}

/// The interpreter `Tk_MainEx` created. Set once, by the bootstrap.
pub static MAIN_INTERP: ProcessSlot<TclHandle> = ProcessSlot::new("main interpreter");

/// The main interpreter for C-side helpers (console output and the like), or NULL before
/// bootstrap.
#[no_mangle]
pub extern "C" fn ds9_global_interp() -> *mut Tcl_Interp {
    MAIN_INTERP
        .get()
        .map_or(ptr::null_mut(), |handle| handle.as_ptr())
}

/// Address of the process's interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TclHandle(NonNull<Tcl_Interp>);

// SAFETY: the handle is only an address. The interpreter it names lives until process
// exit and is only ever driven from the thread that runs the Tk event loop.
unsafe impl Send for TclHandle {}
unsafe impl Sync for TclHandle {}

impl TclHandle {
    pub fn as_ptr(self) -> *mut Tcl_Interp {
        self.0.as_ptr()
    }
}

/// A borrowed view of a live Tcl interpreter.
pub struct TclInterp {
    raw: NonNull<Tcl_Interp>,
}

impl TclInterp {
    /// # Safety
    /// `raw` must be a live interpreter that outlives the returned value.
    pub unsafe fn from_raw(raw: *mut Tcl_Interp) -> Option<Self> {
        NonNull::new(raw).map(|raw| Self { raw })
    }

    fn check(&self, rc: c_int) -> Result<(), InterpError> {
        if rc == TCL_OK {
            return Ok(());
        }
        // SAFETY: the interpreter is live and its result is a NUL-terminated string.
        let message = unsafe { CStr::from_ptr(Tcl_GetStringResult(self.raw.as_ptr())) };
        Err(InterpError::new(message.to_string_lossy()))
    }
}

impl Interpreter for TclInterp {
    type InitProc = TclInitProc;
    type Handle = TclHandle;

    fn call_init(&mut self, init: TclInitProc) -> Result<(), InterpError> {
        let rc = unsafe { init(self.raw.as_ptr()) };
        self.check(rc)
    }

    fn init_core(&mut self) -> Result<(), InterpError> {
        let rc = unsafe { Tcl_Init(self.raw.as_ptr()) };
        self.check(rc)
    }

    fn mount_archive(&mut self, archive: &Path, mount_point: &str) -> Result<(), InterpError> {
        let zipname = native_cstring(archive.as_os_str());
        let mount_point = CString::new(mount_point).unwrap_or_default();
        let rc = unsafe {
            TclZipfs_Mount(
                self.raw.as_ptr(),
                mount_point.as_ptr(),
                zipname.as_ptr(),
                ptr::null(),
            )
        };
        self.check(rc)
    }

    fn provide_static(
        &mut self,
        name: &'static str,
        init: TclInitProc,
        safe_init: Option<TclInitProc>,
    ) {
        // Tcl copies the name.
        let name = CString::new(name).unwrap_or_default();
        unsafe { Tcl_StaticPackage(self.raw.as_ptr(), name.as_ptr(), Some(init), safe_init) }
    }

    fn handle(&self) -> TclHandle {
        TclHandle(self.raw)
    }
}

/// Process-level Tcl entry points.
pub struct TclHost;

impl Host for TclHost {
    fn find_executable(&mut self, argv0: &OsStr) {
        let argv0 = native_cstring(argv0);
        unsafe { Tcl_FindExecutable(argv0.as_ptr()) }
    }

    fn name_of_executable(&self) -> Option<PathBuf> {
        let name = unsafe { Tcl_GetNameOfExecutable() };
        if name.is_null() {
            return None;
        }
        let utf8 = unsafe { CStr::from_ptr(name) }.to_bytes();
        if utf8.is_empty() {
            return None;
        }
        Some(native_path(convert(utf8, Tcl_UtfToExternalDString)))
    }

    fn set_startup_script(&mut self, script: &Path) {
        // Tcl_Obj strings are UTF-8; the path is in the system encoding.
        let utf8 = convert(&native_bytes(script.as_os_str()), Tcl_ExternalToUtfDString);
        let len = c_int::try_from(utf8.len()).unwrap_or(c_int::MAX);
        unsafe {
            let obj = Tcl_NewStringObj(utf8.as_ptr().cast(), len);
            Tcl_SetStartupScript(obj, ptr::null());
        }
    }
}

/// Create the interpreter and run Tk's main loop with `app_init` as the
/// application-init callback. Never returns.
pub fn tk_main(args: &[OsString], app_init: TclInitProc) -> ! {
    let owned: Vec<CString> = args.iter().map(|a| native_cstring(a)).collect();
    let mut argv: Vec<*mut c_char> = owned.iter().map(|a| a.as_ptr() as *mut c_char).collect();
    argv.push(ptr::null_mut());
    let argc = c_int::try_from(owned.len()).unwrap_or(c_int::MAX);

    unsafe {
        Tk_MainEx(argc, argv.as_mut_ptr(), app_init, Tcl_CreateInterp());
        Tcl_Exit(0)
    }
}

/// Terminate through Tcl so its exit handlers run.
pub fn exit(status: c_int) -> ! {
    unsafe { Tcl_Exit(status) }
}

/// Convert between the system encoding and UTF-8 through a scratch `Tcl_DString`.
/// Needs `Tcl_FindExecutable` to have set up the encodings.
fn convert(src: &[u8], conversion: DStringConversion) -> Vec<u8> {
    let len = c_int::try_from(src.len()).unwrap_or(c_int::MAX);
    let mut ds = Tcl_DString::empty();
    unsafe {
        conversion(ptr::null_mut(), src.as_ptr().cast(), len, &mut ds);
        let out_len = usize::try_from(ds.length).unwrap_or(0);
        let out = if ds.string.is_null() {
            Vec::new()
        } else {
            std::slice::from_raw_parts(ds.string.cast::<u8>(), out_len).to_vec()
        };
        Tcl_DStringFree(&mut ds);
        out
    }
}

fn native_cstring(s: &OsStr) -> CString {
    CString::new(native_bytes(s)).unwrap_or_default()
}

#[cfg(unix)]
fn native_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
fn native_bytes(s: &OsStr) -> Cow<'_, [u8]> {
    match s.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

#[cfg(unix)]
fn native_path(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn native_path(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}
