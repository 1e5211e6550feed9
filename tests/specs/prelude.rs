//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;
use std::process::Command as Process;
use tempfile::TempDir;

/// Template whose single parameter receives the packaged code location
pub const TEMPLATE: &str = r#"{
  "Parameters": { "CodeLocation": { "Type": "String" } },
  "Resources": { "Fn": { "Type": "AWS::Lambda::Function" } }
}
"#;

/// Source -> Build (synth + package) -> Deploy, using only `sh` builtins
pub const MANIFEST: &str = r#"
[pipeline]
name = "SpecPipeline"

[[stage]]
name = "Source"

[[stage.action]]
name = "Fetch"
kind = "source"
repository = "."
output = "src"

[[stage]]
name = "Build"

[[stage.action]]
name = "Synth"
kind = "build"
input = "src"
output = "tpl"
commands = ["cp template.json Stack.template.json"]
artifact_files = ["Stack.template.json"]

[[stage.action]]
name = "Package"
kind = "build"
input = "src"
output = "pkg"
commands = ["cd fn", "echo {revision} > REVISION"]
artifact_files = ["**/*"]
base_directory = "fn"

[[stage]]
name = "Deploy"

[[stage.action]]
name = "Apply"
kind = "deploy"
template = "tpl::Stack.template.json"
stack_name = "SpecStack"
admin_permissions = true
extra_inputs = ["pkg"]

[[stage.action.parameter]]
parameter = "CodeLocation"
artifact = "pkg"
"#;

/// A scratch project directory
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A committed repository holding `MANIFEST`, the template and a function
    pub fn with_pipeline() -> Self {
        let project = Self::empty();
        project.file("sw.toml", MANIFEST);
        project.file("template.json", TEMPLATE);
        project.file("fn/app.py", "def lambda_handler(event, context):\n    return {}\n");
        project.file(".gitignore", ".sw/\n");
        project.git_init();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).unwrap()
    }

    /// Initialise a git repository on `main` and commit everything
    pub fn git_init(&self) {
        self.git(&["init", "--quiet"]);
        self.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        self.commit("initial");
    }

    pub fn commit(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&[
            "-c",
            "user.name=spec",
            "-c",
            "user.email=spec@example.com",
            "commit",
            "--quiet",
            "--allow-empty",
            "-m",
            message,
        ]);
    }

    fn git(&self, args: &[&str]) {
        let status = Process::new("git")
            .args(args)
            .current_dir(self.path())
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    pub fn sw(&self) -> Cli {
        let mut cmd = Command::cargo_bin("sw").unwrap();
        cmd.current_dir(self.path())
            .env_remove("SW_STATE_DIR")
            .env_remove("SW_LOG");
        Cli { cmd }
    }
}

/// A pending CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require a zero exit code
    pub fn passes(mut self) -> Output {
        let output = Output::from(self.cmd.output().unwrap());
        assert!(
            output.success,
            "expected success\nstdout:\n{}\nstderr:\n{}",
            output.stdout, output.stderr
        );
        output
    }

    /// Run and require a non-zero exit code
    pub fn fails(mut self) -> Output {
        let output = Output::from(self.cmd.output().unwrap());
        assert!(
            !output.success,
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            output.stdout, output.stderr
        );
        output
    }
}

/// Captured output of a finished invocation
pub struct Output {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout lacks {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout has {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr lacks {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }

    /// First whitespace-separated token of the first stdout line matching
    /// `Execution <id>: ...`
    pub fn execution_id(&self) -> String {
        self.stdout
            .lines()
            .find_map(|line| line.strip_prefix("Execution "))
            .and_then(|rest| rest.split(':').next())
            .unwrap()
            .to_string()
    }
}
