use std::path::{Path, PathBuf};

/// A `--entry` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryArg {
    pub name: String,
    pub path: PathBuf,
}

/// Parse `name=path`, or a bare path named after its file stem.
///
/// Valid: `main=src/main.js`, `src/admin.js`
/// Invalid: `=src/a.js`, `main=`, `""`
pub fn parse_entry(s: &str) -> Result<EntryArg, String> {
    if s.trim().is_empty() {
        return Err("Entry cannot be empty".to_string());
    }

    let (name, path) = match s.split_once('=') {
        Some((name, path)) => (name.trim().to_string(), path.trim()),
        None => {
            let stem = Path::new(s)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| format!("Cannot derive an entry name from '{}'", s))?;
            (stem.to_string(), s)
        }
    };

    if name.is_empty() {
        return Err(format!("Entry name is empty in '{}'", s));
    }
    if path.is_empty() {
        return Err(format!("Entry path is empty in '{}'", s));
    }

    Ok(EntryArg {
        name,
        path: PathBuf::from(path),
    })
}
