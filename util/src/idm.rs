use std::{
    fs::{self, File},
    io::{self, prelude::*},
    path::Path,
};

use anyhow::Context;

/// Fold a data file or a directory tree of `.idm` files into a single IDM
/// document.
///
/// Directory names and file stems become outline headlines and file contents
/// are nested under their headline, so a tree like
///
/// ```text
/// data/
///   tilesheets.idm
///   layouts/
///     standard.idm
/// ```
///
/// reads the same as a single file with `tilesheets` and `layouts` sections.
pub fn directory_to_idm(path: impl AsRef<Path>) -> anyhow::Result<String> {
    use std::fmt::Write;

    let path = path.as_ref();

    // If pointed at a file, just read the file.
    if path.is_file() {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut ret = String::new();
    for e in walkdir::WalkDir::new(path).sort_by_file_name() {
        let e = e.with_context(|| format!("failed to walk {}", path.display()))?;
        let depth = e.depth();
        if depth == 0 {
            // The root element, do not print out.
            continue;
        }

        let indent = "  ".repeat(depth - 1);
        if e.file_type().is_dir() {
            writeln!(ret, "{indent}{}", e.file_name().to_string_lossy())?;
            continue;
        }

        let name = Path::new(e.file_name());
        if name.extension().and_then(|a| a.to_str()) != Some("idm") {
            // Only read IDM files.
            continue;
        }

        let Some(stem) = name.file_stem() else {
            continue;
        };
        writeln!(ret, "{indent}{}", stem.to_string_lossy())?;

        let file = File::open(e.path())
            .with_context(|| format!("failed to open {}", e.path().display()))?;
        for line in io::BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                writeln!(ret)?;
                continue;
            }

            // Turn tab indentation into spaces.
            let body = line.trim_start_matches('\t');
            let tabs = line.len() - body.len();
            writeln!(ret, "{indent}  {}{body}", "  ".repeat(tabs))?;
        }
    }

    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tree_folding() {
        let dir = std::env::temp_dir()
            .join(format!("util-idm-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("layouts")).unwrap();
        fs::write(dir.join("tilesheets.idm"), "default outdoors\n").unwrap();
        fs::write(dir.join("layouts").join("standard.idm"), "x 1\n\ty 2\n")
            .unwrap();
        fs::write(dir.join("README.txt"), "ignored").unwrap();

        let idm = directory_to_idm(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(
            idm,
            "layouts\n  standard\n    x 1\n      y 2\ntilesheets\n  default outdoors\n"
        );
    }

    #[test]
    fn single_file_passthrough() {
        let path = std::env::temp_dir()
            .join(format!("util-idm-single-{}.idm", std::process::id()));
        fs::write(&path, "a 1\n").unwrap();
        let idm = directory_to_idm(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(idm, "a 1\n");
    }
}
