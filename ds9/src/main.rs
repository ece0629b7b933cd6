use anyhow::Context;
use ds9::launch;
use ds9::modules::DS9_PLAN;
use ds9::tcl::{self, Tcl_Interp, TclHost, TclInterp, MAIN_INTERP, TCL_OK};
use ds9_boot::{BootError, InterpError};
use libc::c_int;
use std::ffi::OsString;

fn main() {
    ds9_core::observability::init_tracing();

    let args: Vec<OsString> = std::env::args_os().collect();
    let argv0 = args.first().cloned().unwrap_or_else(|| OsString::from("ds9"));

    let prepared = launch::prepare(&mut TclHost, &argv0)
        .with_context(|| format!("cannot locate the DS9 install from {:?}", argv0));
    if let Err(e) = prepared {
        tracing::error!(error = %format!("{e:#}"), "Startup aborted");
        eprintln!("ds9: {e:?}");
        std::process::exit(1);
    }

    tcl::tk_main(&args, app_init)
}

/// Application-init callback handed to `Tk_MainEx`.
extern "C" fn app_init(raw: *mut Tcl_Interp) -> c_int {
    let result = launch::contained(|| {
        let mut interp = unsafe { TclInterp::from_raw(raw) }
            .ok_or_else(|| BootError::Core(InterpError::new("no interpreter supplied")))?;
        launch::boot(&mut interp, &DS9_PLAN, launch::LAUNCH.get(), &MAIN_INTERP)
    });

    match result {
        Ok(registry) => {
            tracing::debug!(modules = registry.len(), "Interpreter ready");
            TCL_OK
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Bootstrap failed");
            eprintln!("ds9: {e:#}");
            tcl::exit(1)
        }
    }
}
