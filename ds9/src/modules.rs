//! The statically linked packages and the order DS9 starts them in.

use crate::tcl::{Tcl_Interp, TclInitProc, TclZipfs_Init, Tk_Init, Tk_SafeInit};
use ds9_boot::{BootPlan, ModuleRegistration};
use libc::c_int;

extern "C" {
    fn Tkblt_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tktable_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tls_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tksao_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkhtml1_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tclxpa_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tclfitsy_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkmpeg_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tksvg_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkagif_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tclxml_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tclxmlrpc_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkimg_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Zlibtcl_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Jpegtcl_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkimgjpeg_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tifftcl_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkimgtiff_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Tkimgwindow_Init(interp: *mut Tcl_Interp) -> c_int;
    fn Signal_ext_Init(interp: *mut Tcl_Interp) -> c_int;
}

const fn module(name: &'static str, init: TclInitProc) -> ModuleRegistration<TclInitProc> {
    ModuleRegistration::new(name, init)
}

/// Started in this order after Tk; see `launch::DS9_MODULE_ORDER`.
static EXTENSIONS: [ModuleRegistration<TclInitProc>; 20] = [
    module("tkblt", Tkblt_Init),
    module("Tktable", Tktable_Init),
    module("tls", Tls_Init),
    module("tksao", Tksao_Init),
    module("tkhtml1", Tkhtml1_Init),
    module("Tclxpa", Tclxpa_Init),
    module("Tclfitsy", Tclfitsy_Init),
    module("tkmpeg", Tkmpeg_Init),
    module("tksvg", Tksvg_Init),
    module("tkagif", Tkagif_Init),
    module("tclxml", Tclxml_Init),
    module("xmlrpc", Tclxmlrpc_Init),
    module("img", Tkimg_Init),
    module("zlibtcl", Zlibtcl_Init),
    module("jpegtcl", Jpegtcl_Init),
    module("jpeg", Tkimgjpeg_Init),
    module("tifftcl", Tifftcl_Init),
    module("tiff", Tkimgtiff_Init),
    module("window", Tkimgwindow_Init),
    module("signal", Signal_ext_Init),
];

pub static DS9_PLAN: BootPlan<'static, TclInitProc> = BootPlan {
    vfs: module("zipfs", TclZipfs_Init),
    toolkit: ModuleRegistration::<TclInitProc>::with_safe("Tk", Tk_Init, Tk_SafeInit),
    extensions: &EXTENSIONS,
};
