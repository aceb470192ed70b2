//! # Font Resolution Service
//!
//! [`FontLibrary`] owns font byte blobs keyed by full face name: the family,
//! plus the style when it is not a regular one, so `DejaVu Sans` and
//! `DejaVu Sans Bold` live side by side. The host application builds one,
//! loads it explicitly (`register`, `load_dir`) and refreshes it explicitly
//! (`refresh`); nothing is cached behind its back.
//!
//! Selectors are either a face name (`"DejaVu Sans Bold"`) or a family with
//! a style attribute (`"DejaVu Sans:style=Bold"`). A selector that names a
//! known family but an unknown style gets that family's regular face. A
//! request for a family the library does not hold is recovered by falling
//! back to the default font with a warning. Only an empty library is an
//! error.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec2;
use tracing::{debug, instrument, warn};
use ttf_parser::{name_id, Face, OutlineBuilder};

use super::layout::{layout_text, FontMetrics, GlyphOutline, GlyphSource};
use super::{GlyphOutliner, TextParams};
use crate::error::{KernelError, Result};
use crate::geometry::Ring;

/// Style names that do not become part of a face's key.
const REGULAR_STYLES: [&str; 5] = ["", "regular", "book", "normal", "roman"];

/// A font blob registered under a family and style.
#[derive(Debug, Clone)]
pub struct FontFace {
    family: String,
    style: String,
    data: Vec<u8>,
    origin: Option<PathBuf>,
}

impl FontFace {
    /// Family name the face is registered under.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Style (subfamily) read from the font, e.g. `Bold`.
    pub fn style(&self) -> &str {
        &self.style
    }

    /// Full face name: the family, followed by the style unless it is a
    /// regular one.
    pub fn name(&self) -> String {
        if is_regular(&self.style) {
            self.family.clone()
        } else {
            format!("{} {}", self.family, self.style)
        }
    }

    /// File the face was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Parses the blob.
    pub fn parse(&self) -> Result<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| {
            KernelError::resource(format!("font '{}' failed to parse: {e}", self.name()))
        })
    }

    fn key(&self) -> String {
        face_key(&self.family, &self.style)
    }
}

/// Explicit font registry.
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    faces: BTreeMap<String, FontFace>,
    dirs: Vec<PathBuf>,
    default: Option<String>,
}

fn is_regular(style: &str) -> bool {
    REGULAR_STYLES.contains(&style.trim().to_lowercase().as_str())
}

/// Lookup key: lowercase family, then the lowercase style unless regular.
fn face_key(family: &str, style: &str) -> String {
    let family = family.trim().to_lowercase();
    if is_regular(style) {
        family
    } else {
        format!("{family} {}", style.trim().to_lowercase())
    }
}

/// Splits `"Family:style=Bold"` into its family and optional style.
fn parse_selector(selector: &str) -> (&str, Option<&str>) {
    let mut parts = selector.split(':');
    let family = parts.next().unwrap_or_default().trim();
    let style = parts.find_map(|attr| {
        let (name, value) = attr.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("style")
            .then_some(value.trim())
    });
    (family, style)
}

fn name_entry(face: &Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id)
        .find_map(|name| name.to_string())
}

impl FontLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Registered face names in lookup order.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.faces.values().map(FontFace::name)
    }

    /// Registers a font blob under `family`, replacing any previous face of
    /// the same family and style. The style comes from the font itself.
    ///
    /// # Errors
    ///
    /// `Resource` if the bytes are not a parsable font.
    pub fn register(&mut self, family: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let style = Face::parse(&data, 0)
            .map_err(|e| KernelError::resource(format!("font failed to parse: {e}")))
            .map(|face| name_entry(&face, name_id::SUBFAMILY).unwrap_or_default())?;
        self.insert(family.into(), style, data, None);
        Ok(())
    }

    fn insert(&mut self, family: String, style: String, data: Vec<u8>, origin: Option<PathBuf>) {
        let face = FontFace {
            family,
            style,
            data,
            origin,
        };
        debug!(family = face.family(), style = face.style(), "registered font");
        self.faces.insert(face.key(), face);
    }

    /// Loads every `.ttf` / `.otf` file in `dir` and remembers the directory
    /// for [`refresh`](Self::refresh).
    ///
    /// Files that fail to read or parse are skipped with a warning. Returns
    /// the number of faces loaded.
    ///
    /// # Errors
    ///
    /// `Resource` if the directory cannot be read.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref().to_path_buf();
        let loaded = self.scan(&dir)?;
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
        Ok(loaded)
    }

    fn scan(&mut self, dir: &Path) -> Result<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            KernelError::resource(format!("cannot read font directory {}: {e}", dir.display()))
        })?;

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }

            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable font");
                    continue;
                }
            };
            let (family, style) = match Face::parse(&data, 0) {
                Ok(face) => (
                    name_entry(&face, name_id::FAMILY),
                    name_entry(&face, name_id::SUBFAMILY).unwrap_or_default(),
                ),
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unparsable font");
                    continue;
                }
            };
            let family = family
                .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_owned))
                .unwrap_or_default();

            self.insert(family, style, data, Some(path));
            loaded += 1;
        }

        debug!(loaded, "scanned font directory");
        Ok(loaded)
    }

    /// Drops every face loaded from a directory and re-scans the remembered
    /// directories. Faces registered from bytes are kept.
    pub fn refresh(&mut self) -> Result<usize> {
        self.faces.retain(|_, face| face.origin.is_none());
        let dirs = self.dirs.clone();
        let mut loaded = 0;
        for dir in &dirs {
            loaded += self.scan(dir)?;
        }
        Ok(loaded)
    }

    /// Key of the face `selector` names, without falling back.
    ///
    /// Tries the exact face name, then the family and style parts, then the
    /// family's regular face, then any face of that family.
    fn lookup(&self, selector: &str) -> Option<&str> {
        let (family, style) = parse_selector(selector);
        let family_lower = family.to_lowercase();
        let candidates = [
            Some(face_key(selector, "")),
            style.map(|style| face_key(family, style)),
            Some(face_key(family, "")),
        ];

        candidates
            .into_iter()
            .flatten()
            .find_map(|key| self.faces.get_key_value(&key).map(|(k, _)| k.as_str()))
            .or_else(|| {
                self.faces
                    .iter()
                    .find(|(_, face)| face.family.to_lowercase() == family_lower)
                    .map(|(k, _)| k.as_str())
            })
    }

    /// Sets the fallback face.
    ///
    /// # Errors
    ///
    /// `Resource` if no face matches `selector`.
    pub fn set_default(&mut self, selector: &str) -> Result<()> {
        let key = self
            .lookup(selector)
            .map(str::to_owned)
            .ok_or_else(|| KernelError::resource(format!("font '{selector}' is not registered")))?;
        self.default = Some(key);
        Ok(())
    }

    /// Finds the face for `selector`, falling back to the default.
    ///
    /// The default is the face set by [`set_default`](Self::set_default),
    /// else the first registered face in name order.
    ///
    /// # Errors
    ///
    /// `Resource` only if the library is empty.
    pub fn resolve(&self, selector: Option<&str>) -> Result<&FontFace> {
        if let Some(face) = selector
            .and_then(|s| self.lookup(s))
            .and_then(|key| self.faces.get(key))
        {
            return Ok(face);
        }

        let fallback = self
            .default
            .as_ref()
            .and_then(|key| self.faces.get(key))
            .or_else(|| self.faces.values().next())
            .ok_or_else(|| KernelError::resource("no fonts are registered"))?;

        if let Some(requested) = selector {
            warn!(
                requested,
                fallback = %fallback.name(),
                "font not available, using default"
            );
        }
        Ok(fallback)
    }
}

impl GlyphOutliner for FontLibrary {
    fn outline(&self, text: &str, params: &TextParams, curve_steps: usize) -> Result<Vec<Ring>> {
        let face = self.resolve(params.font.as_deref())?.parse()?;
        layout_text(&TtfGlyphs { face }, text, params, curve_steps)
    }
}

/// [`GlyphSource`] over a parsed face.
struct TtfGlyphs<'a> {
    face: Face<'a>,
}

impl GlyphSource for TtfGlyphs<'_> {
    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            units_per_em: f64::from(self.face.units_per_em()),
            ascender: f64::from(self.face.ascender()),
            descender: f64::from(self.face.descender()),
        }
    }

    fn glyph(&self, ch: char, curve_steps: usize) -> Option<GlyphOutline> {
        let id = self.face.glyph_index(ch)?;
        let advance = f64::from(self.face.glyph_hor_advance(id).unwrap_or(0));
        let mut flattener = OutlineFlattener::new(curve_steps);
        // Blank glyphs have no outline but still advance.
        self.face.outline_glyph(id, &mut flattener);
        Some(GlyphOutline {
            advance,
            contours: flattener.finish(),
        })
    }
}

/// Collects closed contours from outline commands, flattening Bézier
/// segments into `steps` line segments each.
struct OutlineFlattener {
    steps: usize,
    contours: Vec<Vec<DVec2>>,
    current: Vec<DVec2>,
    last: DVec2,
}

impl OutlineFlattener {
    fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            contours: Vec::new(),
            current: Vec::new(),
            last: DVec2::ZERO,
        }
    }

    fn flush(&mut self) {
        if self.current.len() >= 3 {
            self.contours.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }

    fn finish(mut self) -> Vec<Vec<DVec2>> {
        self.flush();
        self.contours
    }

    fn push(&mut self, p: DVec2) {
        self.current.push(p);
        self.last = p;
    }
}

fn pt(x: f32, y: f32) -> DVec2 {
    DVec2::new(f64::from(x), f64::from(y))
}

impl OutlineBuilder for OutlineFlattener {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(pt(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(pt(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (p0, p1, p2) = (self.last, pt(x1, y1), pt(x, y));
        for i in 1..=self.steps {
            let t = i as f64 / self.steps as f64;
            let mt = 1.0 - t;
            self.push(p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (p0, p1, p2, p3) = (self.last, pt(x1, y1), pt(x2, y2), pt(x, y));
        for i in 1..=self.steps {
            let t = i as f64 / self.steps as f64;
            let mt = 1.0 - t;
            self.push(
                p0 * (mt * mt * mt)
                    + p1 * (3.0 * mt * mt * t)
                    + p2 * (3.0 * mt * t * t)
                    + p3 * (t * t * t),
            );
        }
    }

    fn close(&mut self) {
        self.flush();
    }
}
