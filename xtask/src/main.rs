//! Workspace developer commands (`cargo xtask`).
//!
//! `build-web` compiles the browser client to wasm and runs `wasm-bindgen`
//! so the server can hand out `/static/pkg/client_core.js`.

use std::{
    env,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

const CLIENT_CRATE: &str = "client_core";
const WASM_TARGET: &str = "wasm32-unknown-unknown";
const DEFAULT_STATIC_DIR: &str = "static";
const BUNDLE_DIR: &str = "pkg";

#[derive(Parser, Debug)]
#[command(name = "xtask")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Build the wasm client into `<static-dir>/pkg`.
    BuildWeb {
        #[arg(long)]
        release: bool,
        #[arg(long, default_value = DEFAULT_STATIC_DIR)]
        static_dir: PathBuf,
    },
    /// Check the client for the host and, when installed, the wasm target.
    CheckWeb,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BuildProfile {
    Dev,
    Release,
}

impl BuildProfile {
    fn target_subdir(self) -> &'static str {
        match self {
            BuildProfile::Dev => "debug",
            BuildProfile::Release => "release",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root()?;

    match cli.command {
        Task::BuildWeb {
            release,
            static_dir,
        } => {
            let profile = if release {
                BuildProfile::Release
            } else {
                BuildProfile::Dev
            };
            build_web(&root, profile, &root.join(static_dir))
        }
        Task::CheckWeb => check_web(&root),
    }
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live directly under the workspace root")
}

fn build_web(root: &Path, profile: BuildProfile, static_dir: &Path) -> Result<()> {
    if !wasm_target_installed() {
        bail!("{WASM_TARGET} target not installed. Install it with `rustup target add {WASM_TARGET}`");
    }
    ensure_command(
        "wasm-bindgen",
        "Install it with `cargo install wasm-bindgen-cli` at the version pinned in Cargo.lock",
    )?;

    run(root, "cargo", cargo_build_args(profile))?;

    let target_dir = env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| root.join("target"));
    let wasm = wasm_artifact(&target_dir, profile);
    let out_dir = static_dir.join(BUNDLE_DIR);
    run(root, "wasm-bindgen", bindgen_args(&wasm, &out_dir))?;

    println!("client bundle written to {}", out_dir.display());
    Ok(())
}

fn check_web(root: &Path) -> Result<()> {
    run(
        root,
        "cargo",
        vec!["check".into(), "-p".into(), CLIENT_CRATE.into()],
    )?;
    if wasm_target_installed() {
        run(
            root,
            "cargo",
            vec![
                "check".into(),
                "-p".into(),
                CLIENT_CRATE.into(),
                "--target".into(),
                WASM_TARGET.into(),
            ],
        )
    } else {
        eprintln!("warning: {WASM_TARGET} target not installed; skipping wasm cargo check");
        Ok(())
    }
}

fn cargo_build_args(profile: BuildProfile) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "build".into(),
        "-p".into(),
        CLIENT_CRATE.into(),
        "--lib".into(),
        "--target".into(),
        WASM_TARGET.into(),
    ];
    if profile == BuildProfile::Release {
        args.push("--release".into());
    }
    args
}

fn wasm_artifact(target_dir: &Path, profile: BuildProfile) -> PathBuf {
    target_dir
        .join(WASM_TARGET)
        .join(profile.target_subdir())
        .join(format!("{CLIENT_CRATE}.wasm"))
}

fn bindgen_args(wasm: &Path, out_dir: &Path) -> Vec<String> {
    vec![
        "--target".into(),
        "web".into(),
        "--no-typescript".into(),
        "--out-dir".into(),
        out_dir.display().to_string(),
        "--out-name".into(),
        CLIENT_CRATE.into(),
        wasm.display().to_string(),
    ]
}

fn run(root: &Path, program: &str, args: Vec<String>) -> Result<()> {
    println!("+ {program} {}", args.join(" "));
    let status = Command::new(program)
        .current_dir(root)
        .args(&args)
        .status()
        .with_context(|| format!("failed to start `{program}`"))?;
    if !status.success() {
        bail!("`{program}` exited with status {status}");
    }
    Ok(())
}

fn ensure_command(program: &str, hint: &str) -> Result<()> {
    let available = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !available {
        bail!("required command `{program}` not found. {hint}");
    }
    Ok(())
}

fn wasm_target_installed() -> bool {
    let Ok(output) = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
    else {
        return false;
    };

    if !output.status.success() {
        return false;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .any(|line| line.trim() == WASM_TARGET)
}
