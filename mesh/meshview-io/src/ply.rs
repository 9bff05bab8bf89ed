//! ASCII PLY-subset loading.
//!
//! The viewer reads a fixed subset of the PLY polygon format:
//!
//! ```text
//! ply
//! <arbitrary header lines>
//! element <name> <vertex count>
//! <arbitrary header lines>
//! element <name> <face count>
//! <arbitrary header lines>
//! end_header
//! <vertex count> lines: x y z a1 a2 a3
//! <face count> lines:   n i0 i1 i2
//! ```
//!
//! The two `element` clauses are interpreted **positionally**: the first
//! declares the vertex count, the second the face count, and the element
//! names are deliberately not validated. This is a structural assumption of
//! the supported subset, not a general PLY parser. Binary encodings and
//! variable-length property lists are out of scope.
//!
//! Per-vertex fields `a1..a3` are either a normal ([`ImportMode::Normals`])
//! or an integer RGB color in 0..=255 ([`ImportMode::Colors`]). In color
//! mode, normals are synthesized from face geometry instead of read from
//! the file; see [`NormalPolicy`] for how shared vertices are resolved.
//!
//! Each face line starts with a vertex-count token that is discarded
//! without validation: the subset assumes triangulated input.
//!
//! # Example
//!
//! ```no_run
//! use meshview_io::{load_ply, LoadOptions};
//!
//! let mesh = load_ply("model.ply", LoadOptions::normals()).unwrap();
//! println!("loaded {} vertices, {} faces", mesh.vertex_count(), mesh.face_count());
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use meshview_types::{Aabb, Mesh, Point3, Vector3};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Magic token expected as the first token of the file.
const MAGIC: &str = "ply";

/// Upper bound on the number of header lines scanned before the load is
/// abandoned with [`IoError::MalformedHeader`]. Keeps a truncated or
/// adversarial header from turning the element scan into an endless loop.
pub const MAX_HEADER_LINES: usize = 4096;

/// Upper bound on a header-declared element count. Larger counts are
/// rejected with [`IoError::MalformedHeader`] instead of being trusted to
/// size allocations.
pub const MAX_ELEMENT_COUNT: usize = 1 << 30;

/// Records worth of buffer space reserved up front. Meshes declaring more
/// grow their buffers as records actually arrive, so a tiny file with an
/// inflated count fails on its missing records, not on the reserve.
const PREALLOC_RECORDS: usize = 1 << 20;

/// How the three per-vertex fields after the position are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportMode {
    /// Fields are a per-vertex normal `(nx, ny, nz)`, stored verbatim.
    Normals,
    /// Fields are an integer color `(r, g, b)` in 0..=255, scaled into
    /// `[0, 1]`. Normals are synthesized from face geometry.
    Colors,
}

/// How synthesized normals are combined on vertices shared between faces.
///
/// Only consulted in [`ImportMode::Colors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalPolicy {
    /// Each face writes its normal into all three of its vertices, so a
    /// shared vertex ends up with the normal of whichever face appears
    /// last in file order. This is the viewer's historical behavior and
    /// the default.
    Overwrite,
    /// Unit face normals are accumulated per vertex and renormalized once
    /// the face block is complete. Vertices referenced by no face keep a
    /// zero normal.
    Averaged,
}

impl Default for NormalPolicy {
    fn default() -> Self {
        Self::Overwrite
    }
}

/// Options selecting the import mode and normal synthesis policy.
///
/// # Example
///
/// ```
/// use meshview_io::{LoadOptions, NormalPolicy};
///
/// let options = LoadOptions::colors().with_normal_policy(NormalPolicy::Averaged);
/// assert_eq!(options.normal_policy, NormalPolicy::Averaged);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Interpretation of the per-vertex attribute fields.
    pub mode: ImportMode,
    /// Shared-vertex policy for synthesized normals.
    pub normal_policy: NormalPolicy,
}

impl LoadOptions {
    /// Options for files carrying per-vertex normals (no colors).
    #[inline]
    #[must_use]
    pub const fn normals() -> Self {
        Self {
            mode: ImportMode::Normals,
            normal_policy: NormalPolicy::Overwrite,
        }
    }

    /// Options for files carrying per-vertex colors; normals are
    /// synthesized with the default [`NormalPolicy::Overwrite`].
    #[inline]
    #[must_use]
    pub const fn colors() -> Self {
        Self {
            mode: ImportMode::Colors,
            normal_policy: NormalPolicy::Overwrite,
        }
    }

    /// Select the shared-vertex policy for synthesized normals.
    #[inline]
    #[must_use]
    pub const fn with_normal_policy(mut self, policy: NormalPolicy) -> Self {
        self.normal_policy = policy;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::normals()
    }
}

/// Load a mesh from an ASCII PLY file.
///
/// # Arguments
///
/// * `path` - Path to the PLY file
/// * `options` - Import mode and normal policy
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the magic token is wrong,
/// the header lacks the required `element`/`end_header` structure, a record
/// is malformed or truncated, a face references a vertex out of range, or
/// (in color mode) a face has zero area.
///
/// # Example
///
/// ```no_run
/// use meshview_io::{load_ply, LoadOptions};
///
/// let mesh = load_ply("model.ply", LoadOptions::colors()).unwrap();
/// assert!(mesh.colors().is_some());
/// ```
pub fn load_ply<P: AsRef<Path>>(path: P, options: LoadOptions) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mesh = read_ply(BufReader::new(file), options)?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded PLY mesh"
    );
    Ok(mesh)
}

/// Load an ASCII PLY file into an existing mesh.
///
/// The destination is cleared before the file is touched and replaced
/// wholesale on success, so no data from a previous load survives. On
/// failure the destination is left empty, never partially populated.
///
/// # Errors
///
/// Same conditions as [`load_ply`].
pub fn load_ply_into<P: AsRef<Path>>(
    mesh: &mut Mesh,
    path: P,
    options: LoadOptions,
) -> IoResult<()> {
    mesh.clear();
    *mesh = load_ply(path, options)?;
    Ok(())
}

/// Line cursor over the input with 1-based position tracking.
///
/// Blank lines are invisible to callers, matching the whitespace-skipping
/// token stream the format was originally defined against.
struct LineCursor<R> {
    reader: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line: 0,
        }
    }

    /// Advance to the next line holding at least one token.
    ///
    /// Returns `Ok(false)` at end of input; the line is then available via
    /// [`LineCursor::tokens`].
    fn advance(&mut self) -> IoResult<bool> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !self.buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    /// Like [`LineCursor::advance`], but bounded by [`MAX_HEADER_LINES`].
    fn advance_header(&mut self) -> IoResult<bool> {
        loop {
            if self.line >= MAX_HEADER_LINES {
                return Err(IoError::malformed_header(
                    self.line,
                    format!("no `end_header` within the first {MAX_HEADER_LINES} lines"),
                ));
            }
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !self.buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    /// Whitespace-separated tokens of the current line.
    fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.buf.split_whitespace()
    }
}

/// Parse the header, returning `(vertex_count, face_count)`.
///
/// On return the cursor sits on the `end_header` line; data records begin
/// on the next line.
fn parse_header<R: BufRead>(lines: &mut LineCursor<R>) -> IoResult<(usize, usize)> {
    if !lines.advance_header()? {
        return Err(IoError::BadMagic {
            found: String::new(),
        });
    }
    let magic = lines.tokens().next().unwrap_or("");
    if magic != MAGIC {
        return Err(IoError::BadMagic {
            found: magic.to_string(),
        });
    }

    // Positional interpretation: first element clause = vertices, second =
    // faces. Names are not checked.
    let vertex_count = scan_element_count(lines)?;
    let face_count = scan_element_count(lines)?;
    scan_end_header(lines)?;

    Ok((vertex_count, face_count))
}

/// Scan forward to the next `element` clause and parse its count.
fn scan_element_count<R: BufRead>(lines: &mut LineCursor<R>) -> IoResult<usize> {
    loop {
        if !lines.advance_header()? {
            return Err(IoError::malformed_header(
                lines.line,
                "end of file before `element` declaration",
            ));
        }
        let mut tokens = lines.tokens();
        match tokens.next() {
            Some("element") => {}
            Some("end_header") => {
                return Err(IoError::malformed_header(
                    lines.line,
                    "`end_header` before both `element` declarations",
                ));
            }
            _ => continue,
        }
        if tokens.next().is_none() {
            return Err(IoError::malformed_header(
                lines.line,
                "`element` declaration missing a name",
            ));
        }
        return match tokens.next() {
            Some(count) => {
                let count = count.parse::<usize>().map_err(|_| {
                    IoError::malformed_header(
                        lines.line,
                        format!("invalid element count {count:?}"),
                    )
                })?;
                if count > MAX_ELEMENT_COUNT {
                    return Err(IoError::malformed_header(
                        lines.line,
                        format!(
                            "element count {count} exceeds the supported maximum of {MAX_ELEMENT_COUNT}"
                        ),
                    ));
                }
                Ok(count)
            }
            None => Err(IoError::malformed_header(
                lines.line,
                "`element` declaration missing a count",
            )),
        };
    }
}

/// Scan forward to the `end_header` line, discarding everything before it.
fn scan_end_header<R: BufRead>(lines: &mut LineCursor<R>) -> IoResult<()> {
    loop {
        if !lines.advance_header()? {
            return Err(IoError::malformed_header(
                lines.line,
                "end of file before `end_header`",
            ));
        }
        if lines.tokens().next() == Some("end_header") {
            return Ok(());
        }
    }
}

/// The vertex block: positions, the mode-dependent attribute buffer
/// (normals or colors), and the running bounding box.
struct VertexBlock {
    positions: Vec<f32>,
    attributes: Vec<f32>,
    bounds: Aabb,
}

/// Read exactly `vertex_count` vertex records.
///
/// Each record needs at least six numeric fields; anything past the sixth
/// is ignored. The bounding box grows per axis as positions stream in, so
/// it is tight once the block is complete.
fn read_vertex_block<R: BufRead>(
    lines: &mut LineCursor<R>,
    vertex_count: usize,
    mode: ImportMode,
) -> IoResult<VertexBlock> {
    let reserve = 3 * vertex_count.min(PREALLOC_RECORDS);
    let mut positions = Vec::with_capacity(reserve);
    let mut attributes = Vec::with_capacity(reserve);
    let mut bounds = Aabb::empty();

    for _ in 0..vertex_count {
        if !lines.advance()? {
            return Err(IoError::UnexpectedEof { line: lines.line });
        }
        let fields: Vec<&str> = lines.tokens().collect();
        if fields.len() < 6 {
            return Err(IoError::ShortRecord {
                line: lines.line,
                expected: 6,
                found: fields.len(),
            });
        }

        let x: f32 = fields[0].parse()?;
        let y: f32 = fields[1].parse()?;
        let z: f32 = fields[2].parse()?;
        positions.extend_from_slice(&[x, y, z]);
        bounds.expand_to_include(&Point3::new(x, y, z));

        match mode {
            ImportMode::Normals => {
                for field in &fields[3..6] {
                    attributes.push(field.parse::<f32>()?);
                }
            }
            ImportMode::Colors => {
                // 255.0 divisor forces float division of the byte channels
                for field in &fields[3..6] {
                    attributes.push(field.parse::<f32>()? / 255.0);
                }
            }
        }
    }

    Ok(VertexBlock {
        positions,
        attributes,
        bounds,
    })
}

/// Read exactly `face_count` face records, validating every vertex index.
///
/// In color mode this also synthesizes per-vertex normals from face
/// geometry, returned as a `3 * vertex_count` buffer; in normal mode the
/// returned buffer is empty.
fn read_face_block<R: BufRead>(
    lines: &mut LineCursor<R>,
    face_count: usize,
    positions: &[f32],
    options: LoadOptions,
) -> IoResult<(Vec<u32>, Vec<f32>)> {
    let vertex_count = positions.len() / 3;
    let mut indices = Vec::with_capacity(3 * face_count.min(PREALLOC_RECORDS));
    let mut normals = match options.mode {
        ImportMode::Normals => Vec::new(),
        ImportMode::Colors => vec![0.0; positions.len()],
    };

    for face in 0..face_count {
        if !lines.advance()? {
            return Err(IoError::UnexpectedEof { line: lines.line });
        }
        let fields: Vec<&str> = lines.tokens().collect();
        if fields.len() < 4 {
            return Err(IoError::ShortRecord {
                line: lines.line,
                expected: 4,
                found: fields.len(),
            });
        }

        // fields[0] is the per-face vertex count; discarded unchecked, the
        // subset assumes triangulated input
        let mut tri = [0_u32; 3];
        for (slot, field) in tri.iter_mut().zip(&fields[1..4]) {
            let index: u32 = field.parse()?;
            if index as usize >= vertex_count {
                return Err(IoError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
            *slot = index;
        }
        indices.extend_from_slice(&tri);

        if options.mode == ImportMode::Colors {
            let normal = face_normal(positions, tri).ok_or(IoError::DegenerateFace { face })?;
            apply_face_normal(&mut normals, tri, &normal, options.normal_policy);
        }
    }

    if options.mode == ImportMode::Colors && options.normal_policy == NormalPolicy::Averaged {
        renormalize(&mut normals);
    }

    Ok((indices, normals))
}

/// Unit normal of the triangle `(a, b, c)` via the cross product of its
/// edge vectors, or `None` if the triangle has zero area.
fn face_normal(positions: &[f32], [a, b, c]: [u32; 3]) -> Option<Vector3<f32>> {
    let point = |i: u32| {
        let i = 3 * i as usize;
        Vector3::new(positions[i], positions[i + 1], positions[i + 2])
    };
    let (pa, pb, pc) = (point(a), point(b), point(c));

    let normal = (pb - pa).cross(&(pc - pa));
    let len = normal.norm();
    if len.is_finite() && len > f32::EPSILON {
        Some(normal / len)
    } else {
        None
    }
}

/// Write or accumulate a face normal into the slots of its three vertices.
fn apply_face_normal(
    normals: &mut [f32],
    tri: [u32; 3],
    normal: &Vector3<f32>,
    policy: NormalPolicy,
) {
    for &index in &tri {
        let slot = 3 * index as usize;
        match policy {
            NormalPolicy::Overwrite => {
                normals[slot] = normal.x;
                normals[slot + 1] = normal.y;
                normals[slot + 2] = normal.z;
            }
            NormalPolicy::Averaged => {
                normals[slot] += normal.x;
                normals[slot + 1] += normal.y;
                normals[slot + 2] += normal.z;
            }
        }
    }
}

/// Renormalize accumulated vertex normals to unit length.
///
/// Vertices no face touched keep their zero normal.
fn renormalize(normals: &mut [f32]) {
    for n in normals.chunks_exact_mut(3) {
        let v = Vector3::new(n[0], n[1], n[2]);
        let len = v.norm();
        if len > f32::EPSILON {
            n[0] = v.x / len;
            n[1] = v.y / len;
            n[2] = v.z / len;
        }
    }
}

/// Parse a complete ASCII PLY document from any buffered reader.
fn read_ply<R: BufRead>(reader: R, options: LoadOptions) -> IoResult<Mesh> {
    let mut lines = LineCursor::new(reader);

    let (vertex_count, face_count) = parse_header(&mut lines)?;
    debug!(vertex_count, face_count, "parsed PLY header");

    let block = read_vertex_block(&mut lines, vertex_count, options.mode)?;
    let (indices, synthesized) = read_face_block(&mut lines, face_count, &block.positions, options)?;

    let mesh = match options.mode {
        ImportMode::Normals => Mesh::from_parts(
            block.positions,
            block.attributes,
            None,
            indices,
            block.bounds,
        ),
        ImportMode::Colors => Mesh::from_parts(
            block.positions,
            synthesized,
            Some(block.attributes),
            indices,
            block.bounds,
        ),
    };
    Ok(mesh)
}
