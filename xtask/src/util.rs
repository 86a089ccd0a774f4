use log::{error, trace};
use std::{
    env,
    path::{Path, PathBuf},
    process::{self, Command},
};

use crate::Env;

pub(crate) fn project_root() -> PathBuf {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}

pub(crate) fn dist_dir(env: &Env, target: &str) -> PathBuf {
    let mut path_buf = project_root().join("target").join(target);
    path_buf = match env.release {
        true => path_buf.join("release"),
        false => path_buf.join("debug"),
    };
    path_buf
}

pub(crate) fn get_cargo_cmd_in(env: &Env, root: PathBuf, command: &str) -> Command {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    trace!("found cargo at {cargo}, working in {root:?}");
    let mut cmd = Command::new(cargo);
    cmd.current_dir(root);
    cmd.arg(command);
    if env.release {
        cmd.arg("--release");
    }
    cmd.arg("--target-dir").arg(project_root().join("target"));
    cmd
}

pub(crate) fn find_binutils_prefix(arch: &str) -> Option<String> {
    let cross = format!("{arch}-none-eabi-");
    for prefix in ["rust-", cross.as_str()] {
        let mut command = Command::new(format!("{prefix}objcopy"));
        command.arg("--version");
        let status = command
            .stdout(process::Stdio::null())
            .stderr(process::Stdio::null())
            .status();
        trace!("finding binutils with prefix {prefix}: {status:?}");
        if status.map(|s| s.success()).unwrap_or(false) {
            return Some(prefix.to_string());
        }
    }
    None
}

pub(crate) fn find_binutils_prefix_or_fail(arch: &str) -> String {
    trace!("find binutils");
    if let Some(ans) = find_binutils_prefix(arch) {
        trace!("found binutils, prefix is '{ans}'");
        return ans;
    }
    error!(
        "no binutils found, try install using:
    rustup component add llvm-tools-preview
    cargo install cargo-binutils"
    );
    process::exit(1)
}

pub(crate) fn objcopy(env: &Env, binutils_prefix: &str, target: &str, elf: &str, bin: &str) {
    let dist_dir = dist_dir(env, target);
    trace!("objcopy binary, prefix: '{binutils_prefix}', {elf} -> {bin}");
    let status = Command::new(format!("{binutils_prefix}objcopy"))
        .current_dir(&dist_dir)
        .arg(elf)
        .arg("--binary-architecture=arm")
        .arg("--strip-all")
        .args(["-O", "binary", bin])
        .status()
        .unwrap();
    trace!("objcopy returned {status}");
    if !status.success() {
        error!("objcopy failed with {status}");
        process::exit(1);
    }
    trace!("output file: {:?}", dist_dir.join(bin));
}
