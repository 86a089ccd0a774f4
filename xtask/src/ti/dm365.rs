use crate::util::{
    dist_dir, find_binutils_prefix_or_fail, get_cargo_cmd_in, objcopy, project_root,
};
use crate::Env;
use log::{error, info, trace};
use std::process;

const ARCH: &str = "arm";
const TARGET: &str = "armv5te-none-eabi";

const ELF: &str = "ti-dm365-evm";
const IMAGE_BIN: &str = "ti-dm365-evm.bin";

/// Upper bound for an image the boot ROM can load into internal RAM.
const IRAM_IMAGE_MAX: u64 = 0x7fc0;

pub(crate) fn execute_command(env: &Env) {
    info!("building DM365 EVM");
    // Get binutils first so we can fail early
    let binutils_prefix = find_binutils_prefix_or_fail(ARCH);
    xtask_build_dm365_evm(env);
    objcopy(env, &binutils_prefix, TARGET, ELF, IMAGE_BIN);
    xtask_check_size(env);
}

fn xtask_build_dm365_evm(env: &Env) {
    trace!("build DM365 EVM");
    let mut command = get_cargo_cmd_in(env, board_project_root(), "build");
    if !env.features.is_empty() {
        let command_line_features = env.features.join(",");
        trace!("append command line features: {command_line_features}");
        command.args(["--features", &command_line_features]);
    } else {
        trace!("no command line features appended");
    }
    let status = command.status().unwrap();
    trace!("cargo returned {status}");
    if !status.success() {
        error!("cargo build failed with {status}");
        process::exit(1);
    }
}

fn xtask_check_size(env: &Env) {
    let path = dist_dir(env, TARGET).join(IMAGE_BIN);
    let len = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    if len > IRAM_IMAGE_MAX {
        error!("{path:?} is {len} bytes, internal RAM holds {IRAM_IMAGE_MAX}");
        process::exit(1);
    }
    println!("======= DONE =======");
    println!("Output file: {:?}", path.into_os_string());
}

fn board_project_root() -> std::path::PathBuf {
    project_root().join("src/mainboard/ti/dm365-evm")
}
