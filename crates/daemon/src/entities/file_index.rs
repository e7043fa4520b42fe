use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
/// Names of shareable files in the shared directory, mapped to their full
/// paths. Rebuilt on demand; every rebuild replaces the previous mapping.
pub struct FileIndex {
    shared_dir: PathBuf,
    map: HashMap<String, PathBuf>,
}

impl FileIndex {
    /// An empty index; call `rebuild` to populate it.
    pub fn new(shared_dir: impl Into<PathBuf>) -> Self {
        FileIndex {
            shared_dir: shared_dir.into(),
            map: HashMap::new(),
        }
    }

    /// Scans the shared directory, top level only, files only. The old
    /// mapping is dropped wholesale even when the scan comes back smaller.
    pub fn rebuild(&mut self) -> io::Result<()> {
        let mut map = HashMap::new();
        for entry in fs::read_dir(&self.shared_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                map.insert(entry.file_name().to_string_lossy().into_owned(), path);
            }
        }
        self.map = map;
        Ok(())
    }

    /// Full path of a shared file, or `None` if the name is not offered.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.map.get(name).cloned()
    }

    /// File names as announced to the tracker.
    pub fn names(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> HashMap<String, PathBuf> {
        self.map.clone()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn touch(dir: &TempDir, name: &str, content: &[u8]) {
        let mut file = File::create(dir.path().join(name)).unwrap();
        file.write_all(content).unwrap();
    }

    #[test]
    fn rebuild_indexes_files_and_skips_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt", b"aaa");
        touch(&dir, "b.txt", b"bbb");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let mut index = FileIndex::new(dir.path());
        index.rebuild().unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.resolve("a.txt"), Some(dir.path().join("a.txt")));
        assert_eq!(index.resolve("nested"), None);
        assert_eq!(index.resolve("missing.txt"), None);

        let mut names = index.names();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn rebuild_replaces_the_previous_mapping() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt", b"aaa");

        let mut index = FileIndex::new(dir.path());
        index.rebuild().unwrap();
        assert!(index.resolve("a.txt").is_some());

        fs::remove_file(dir.path().join("a.txt")).unwrap();
        touch(&dir, "b.txt", b"bbb");
        index.rebuild().unwrap();

        assert_eq!(index.resolve("a.txt"), None);
        assert!(index.resolve("b.txt").is_some());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn new_index_is_empty_until_rebuilt() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.txt", b"aaa");

        let index = FileIndex::new(dir.path());
        assert!(index.is_empty());
        assert_eq!(index.names(), Vec::<String>::new());
    }

    #[test]
    fn rebuild_of_a_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let mut index = FileIndex::new(dir.path().join("gone"));
        assert!(index.rebuild().is_err());
    }
}
