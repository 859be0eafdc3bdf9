//! Collecting SVG files and assigning them code points.

use std::cmp::Ordering;
use std::path::{Component, Path};

use walkdir::{DirEntry, WalkDir};

use crate::backend::FontBackend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::importer;

/// Code points and the relative path of the SVG each was generated from, in visiting order.
pub type PathTable = Vec<(char, String)>;

/// Whether a file name marks an SVG. The check is case-sensitive.
pub fn is_svg(file_name: &str) -> bool {
    file_name.ends_with(".svg")
}

/// `path` relative to `root`, with components joined by `/`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Hands out successive code points, starting at `first`.
#[derive(Clone, Copy, Debug)]
pub struct CodepointAllocator {
    next: u32,
}

impl CodepointAllocator {
    /// An allocator whose first code point is `first`.
    pub fn new(first: u32) -> Self {
        Self { next: first }
    }

    /// Takes the next code point, failing once it leaves the Unicode scalar range.
    pub fn next_codepoint(&mut self) -> Result<char> {
        let codepoint = char::from_u32(self.next).ok_or(Error::InvalidCodepoint(self.next))?;
        self.next += 1;
        Ok(codepoint)
    }
}

/// Imports every SVG below `config.source` into `font` and returns the path table.
pub fn walk<B: FontBackend>(font: &mut B, config: &Config) -> Result<PathTable> {
    walk_with(&config.source, config.first_char, config.sorted, |codepoint, path| {
        importer::add_glyph(font, codepoint, path, config.import_options())
    })
}

/// Lists the files of a directory before its subdirectories.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type().is_dir().cmp(&b.file_type().is_dir())
}

/// Visits every SVG below `root`, calling `visit` with its code point and full path.
///
/// Each directory's files are visited before any of its subdirectories.
/// Symlinked files are included, symlinked directories are not descended into.
pub fn walk_with<F>(root: &Path, first_char: u32, sorted: bool, mut visit: F) -> Result<PathTable>
where
    F: FnMut(char, &Path) -> Result<()>,
{
    let walker = WalkDir::new(root);
    let walker = if sorted {
        walker.sort_by(|a, b| files_first(a, b).then_with(|| a.file_name().cmp(b.file_name())))
    } else {
        walker.sort_by(files_first)
    };

    let mut codepoints = CodepointAllocator::new(first_char);
    let mut table = PathTable::new();

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir()
            || !is_svg(&entry.file_name().to_string_lossy())
            || !entry.path().is_file()
        {
            continue;
        }

        let codepoint = codepoints.next_codepoint()?;
        let path = entry.path();
        log::info!("Adding {} as {}", path.display(), u32::from(codepoint));

        visit(codepoint, path)?;
        table.push((codepoint, relative_path(root, path)));
    }

    Ok(table)
}
