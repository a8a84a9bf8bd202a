use std::path::{Path, PathBuf};

use log::debug;

use crate::compiler::SourceLoader;

pub const SPRIG_FILE_EXT: &str = "sprig";

/// Loads source files from disk.  The file id `shapes/point` is read from
/// `<root>/shapes/point.sprig`; a file id which already has the `.sprig`
/// extension is used as is.
#[derive(Clone, Debug)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: &Path) -> FileLoader {
        FileLoader {
            root: root.to_path_buf(),
        }
    }

    /// Splits the path of the root source file into a loader for its
    /// directory and the file id of the source file.
    pub fn for_file(path: &Path) -> Result<(FileLoader, String), String> {
        let file_id = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| format!("{} is not a valid source file name", path.display()))?;
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Ok((FileLoader::new(root), file_id.into()))
    }

    pub fn path_of(&self, file_id: &str) -> Result<PathBuf, String> {
        let path = self.root.join(file_id);
        match path.extension() {
            None => Ok(path.with_extension(SPRIG_FILE_EXT)),
            Some(ex) if ex.to_ascii_lowercase() == SPRIG_FILE_EXT => Ok(path),
            Some(ex) => Err(format!(
                "Is not a Sprig language file, expected extension {} but got {}",
                SPRIG_FILE_EXT,
                ex.to_string_lossy()
            )),
        }
    }
}

impl SourceLoader for FileLoader {
    fn load(&mut self, file_id: &str) -> Result<String, String> {
        let path = self.path_of(file_id)?;
        debug!("Reading {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of() {
        let loader = FileLoader::new(Path::new("src"));
        assert_eq!(
            loader.path_of("shapes/point"),
            Ok(PathBuf::from("src/shapes/point.sprig"))
        );
        assert_eq!(
            loader.path_of("main.sprig"),
            Ok(PathBuf::from("src/main.sprig"))
        );
        assert!(loader.path_of("main.rs").is_err());
    }

    #[test]
    fn test_for_file() {
        let (loader, file_id) = FileLoader::for_file(Path::new("project/main.sprig")).unwrap();
        assert_eq!(file_id, "main.sprig");
        assert_eq!(
            loader.path_of("util"),
            Ok(PathBuf::from("project/util.sprig"))
        );
    }

    #[test]
    fn test_load() {
        let dir = std::env::temp_dir().join("sprig_file_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lib.sprig"), "export var x: u8;").unwrap();

        let mut loader = FileLoader::new(&dir);
        assert_eq!(loader.load("lib"), Ok("export var x: u8;".to_string()));
        assert!(loader.load("missing").is_err());
    }
}
