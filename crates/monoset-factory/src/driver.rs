//! Compilation driver
//!
//! Compiles a set of generated sources as one library unit by running the
//! configured toolchain as a blocking subprocess. Only the exit status
//! decides success; stderr is kept (its tail) for logs. A failed compilation
//! is deterministic for the same sources and is never retried.

use crate::config::ToolchainConfig;
use log::{debug, info};
use monoset_specialize::{absolute_path, include_item, module_name};
use monoset_types::{SpecializationError, SpecializationResult};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Lines of compiler stderr kept for diagnostics.
const STDERR_TAIL_LINES: usize = 20;
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A successful compilation.
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Root file the sources were compiled through
    pub unit_path: PathBuf,
    pub crate_name: String,
    pub duration: Duration,
    pub stderr_tail: String,
}

#[derive(Debug, Clone)]
pub struct CompilationDriver {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CompilationDriver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn from_config(config: &ToolchainConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Compile `sources` (dependencies first) into `out_dir`, resolving the
    /// runtime crate from `overlay`.
    pub fn compile(&self, sources: &[PathBuf], overlay: &Path, out_dir: &Path) -> SpecializationResult<CompileOutcome> {
        let last = sources.last().ok_or_else(|| SpecializationError::CompilationFailed {
            exit_code: None,
            reason: "no sources to compile".to_string(),
        })?;
        let stem = last.file_stem().and_then(|s| s.to_str()).unwrap_or("unit");
        let crate_name = format!("monoset_{}", module_name(stem));

        fs::create_dir_all(out_dir).map_err(|e| SpecializationError::io(out_dir, e))?;
        let unit_path = out_dir.join(format!("{}.rs", crate_name));
        fs::write(&unit_path, unit_root(sources)?).map_err(|e| SpecializationError::io(&unit_path, e))?;

        let args = self.expand_args(sources, overlay, out_dir, &unit_path, &crate_name);
        debug!("running {} {}", self.program, args.join(" "));

        let start = Instant::now();
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SpecializationError::CompilationFailed {
                exit_code: None,
                reason: format!("failed to run `{}`: {}", self.program, e),
            })?;

        let (status, stderr) = self.wait(child)?;
        let duration = start.elapsed();
        let stderr_tail = tail(&stderr, STDERR_TAIL_LINES);

        if !status.success() {
            return Err(SpecializationError::CompilationFailed {
                exit_code: status.code(),
                reason: if stderr_tail.is_empty() {
                    format!("`{}` exited with {}", self.program, status)
                } else {
                    stderr_tail
                },
            });
        }

        info!("compiled {} in {:.2}s", crate_name, duration.as_secs_f64());
        Ok(CompileOutcome {
            unit_path,
            crate_name,
            duration,
            stderr_tail,
        })
    }

    fn expand_args(&self, sources: &[PathBuf], overlay: &Path, out_dir: &Path, unit: &Path, crate_name: &str) -> Vec<String> {
        let source_list: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
        let mut args = Vec::with_capacity(self.args.len() + sources.len());
        for arg in &self.args {
            if arg == "{sources}" {
                args.extend(source_list.iter().cloned());
                continue;
            }
            args.push(
                arg.replace("{overlay}", &overlay.display().to_string())
                    .replace("{out_dir}", &out_dir.display().to_string())
                    .replace("{unit}", &unit.display().to_string())
                    .replace("{crate_name}", crate_name)
                    .replace("{sources}", &source_list.join(" ")),
            );
        }
        args
    }

    /// Wait for the child, draining stderr on a separate thread so a chatty
    /// compiler cannot block on a full pipe.
    fn wait(&self, mut child: Child) -> SpecializationResult<(ExitStatus, String)> {
        let reader = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let status = match self.timeout {
            None => child.wait().map_err(|e| failed_wait(&self.program, e))?,
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    if let Some(status) = child.try_wait().map_err(|e| failed_wait(&self.program, e))? {
                        break status;
                    }
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(SpecializationError::CompilationFailed {
                            exit_code: None,
                            reason: format!("`{}` timed out after {}s", self.program, limit.as_secs()),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        };

        let stderr = reader.and_then(|handle| handle.join().ok()).unwrap_or_default();
        Ok((status, stderr))
    }
}

fn failed_wait(program: &str, e: std::io::Error) -> SpecializationError {
    SpecializationError::CompilationFailed {
        exit_code: None,
        reason: format!("failed to wait for `{}`: {}", program, e),
    }
}

/// Root file of a compilation unit: one module per source, in order.
fn unit_root(sources: &[PathBuf]) -> SpecializationResult<String> {
    let mut root = String::from("// @generated by monoset. Do not edit.\n\n");
    for source in sources {
        let absolute = absolute_path(source)?;
        let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("source");
        root.push_str(&include_item(&module_name(stem), &absolute));
        root.push('\n');
    }
    Ok(root)
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}
