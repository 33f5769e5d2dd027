use assert_cmd::Command;
use assert_fs::{fixture::ChildPath, prelude::*, TempDir};
use std::path::Path;

/// A scratch directory the binary runs in, with SVG fixtures copied under
/// `input/`.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Copies fixtures from `tests/assets` into `input/`.
    pub fn with_fixtures(names: &[&str]) -> Self {
        let project = Self::new();
        for name in names {
            project.add_file(name);
        }
        project
    }

    pub fn write_config(&self, contents: toml::Table) {
        self.dir
            .child("svgfetch.toml")
            .write_str(&contents.to_string())
            .unwrap();
    }

    pub fn add_file(&self, name: &str) -> ChildPath {
        let file = self.dir.child("input").child(name);
        file.write_file(&Path::new("tests").join("assets").join(name))
            .unwrap();
        file
    }

    pub fn image_size(&self, path: &str) -> (u32, u32) {
        image::image_dimensions(self.dir.child(path).path()).unwrap()
    }

    pub fn run(&self) -> Command {
        let mut cmd = Command::cargo_bin("svgfetch").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("SVGFETCH_USER_AGENT")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `svgfetch render input/<fixture> -o <output>` plus `extra`, without
    /// system fonts.
    pub fn render(&self, fixture: &str, output: &str, extra: &[&str]) -> Command {
        let mut cmd = self.run();
        cmd.arg("render")
            .arg(format!("input/{fixture}"))
            .args(["-o", output])
            .args(extra)
            .arg("--no-system-fonts");
        cmd
    }
}
