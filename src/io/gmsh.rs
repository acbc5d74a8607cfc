//! Gmsh `.msh` reader.
//!
//! # Supported format
//! - ASCII `.msh`, version **2.2** or newer in the 2.x section layout.
//! - Sections `$MeshFormat`, `$PhysicalNames`, `$Nodes` and `$Elements`;
//!   anything else (including the `$End...` markers) is skipped token by token.
//! - All element types of [`ElementType`].
//! - Partition tags (`n_partitions`, owner, negated ghost partitions) as
//!   written by Gmsh's mesh partitioner.
//!
//! # Limitations
//! - Binary files are not supported.
//! - `.msh` v4.x (block-based) node/element sections are not understood.

use crate::algs::interface::InterfaceAccumulator;
use crate::data::mesh::{Element, Mesh, Node, Ownership, PhysicalGroups};
use crate::io::MeshReader;
use crate::mesh_error::MeshError;
use crate::topology::element_type::ElementType;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Oldest `$MeshFormat` version accepted.
pub const MIN_SUPPORTED_VERSION: f64 = 2.2;

/// Everything decoded from one `.msh` file.
#[derive(Clone, Debug, Default)]
pub struct GmshData {
    /// Version string from `$MeshFormat`, if the section was present.
    pub version: Option<String>,
    pub physical_groups: PhysicalGroups,
    /// Nodes in file order.
    pub nodes: Vec<Node>,
    pub mesh: Mesh,
    pub interfaces: InterfaceAccumulator,
    /// Largest partition id seen in any element tag, 1 when unpartitioned.
    pub partition_count: u32,
}

/// Gmsh `.msh` reader for ASCII 2.x meshes.
#[derive(Debug, Default, Clone)]
pub struct GmshReader;

impl GmshReader {
    /// Open and decode the file at `path`.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<GmshData, MeshError> {
        let path = path.as_ref();
        log::debug!("reading gmsh mesh {}", path.display());
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Decode an in-memory `.msh` document.
    pub fn parse_str(&self, contents: &str) -> Result<GmshData, MeshError> {
        let mut decoder = Decoder::new(contents);
        decoder.run()?;
        Ok(decoder.finish())
    }
}

impl MeshReader for GmshReader {
    type Output = GmshData;

    fn read<R: Read>(&self, mut reader: R) -> Result<GmshData, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        self.parse_str(&contents)
    }
}

/// Whitespace tokenizer with support for quoted names.
struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = &self.src[self.pos..];
        if rest.is_empty() {
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    /// A `"quoted name"` that may contain spaces; quotes are stripped.
    fn next_quoted(&mut self) -> Option<String> {
        self.skip_whitespace();
        let rest = &self.src[self.pos..];
        if let Some(body) = rest.strip_prefix('"') {
            if let Some(close) = body.find('"') {
                self.pos += close + 2;
                return Some(body[..close].to_string());
            }
        }
        self.next_token().map(|t| t.replace('"', ""))
    }

    fn parse<T: FromStr>(&mut self, section: &'static str, what: &str) -> Result<T, MeshError> {
        self.parse_raw(section, what).map(|(value, _)| value)
    }

    /// Parse the next token, also returning its text.
    fn parse_raw<T: FromStr>(
        &mut self,
        section: &'static str,
        what: &str,
    ) -> Result<(T, &'a str), MeshError> {
        let token = self.next_token().ok_or_else(|| {
            MeshError::malformed(section, format!("unexpected end of input, expected {what}"))
        })?;
        let value = token
            .parse::<T>()
            .map_err(|_| MeshError::malformed(section, format!("invalid {what}: {token}")))?;
        Ok((value, token))
    }

    /// Node and element ids are positive.
    fn parse_id(&mut self, section: &'static str, what: &str) -> Result<u64, MeshError> {
        match self.parse::<u64>(section, what)? {
            0 => Err(MeshError::malformed(section, format!("{what} must be positive"))),
            id => Ok(id),
        }
    }
}

/// Single-pass section state machine.
struct Decoder<'a> {
    tokens: Tokens<'a>,
    data: GmshData,
    undeclared: BTreeSet<i64>,
}

impl<'a> Decoder<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            tokens: Tokens::new(src),
            data: GmshData {
                partition_count: 1,
                ..GmshData::default()
            },
            undeclared: BTreeSet::new(),
        }
    }

    fn run(&mut self) -> Result<(), MeshError> {
        while let Some(token) = self.tokens.next_token() {
            match token {
                "$MeshFormat" => self.mesh_format()?,
                "$PhysicalNames" => self.physical_names()?,
                "$Nodes" => self.nodes()?,
                "$Elements" => self.elements()?,
                _ => {
                    // ignore other sections
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> GmshData {
        let data = self.data;
        log::info!(
            "decoded gmsh mesh: {} nodes, {} elements in {} blocks, {} partition(s)",
            data.nodes.len(),
            data.mesh.element_count(),
            data.mesh.len(),
            data.partition_count
        );
        data
    }

    fn mesh_format(&mut self) -> Result<(), MeshError> {
        const SECTION: &str = "MeshFormat";
        let (version, raw) = self.tokens.parse_raw::<f64>(SECTION, "version")?;
        if version < MIN_SUPPORTED_VERSION {
            return Err(MeshError::UnsupportedVersion(raw.to_string()));
        }
        if version >= 3.0 {
            log::warn!("gmsh version {raw} uses a block layout this reader does not understand");
        }
        let file_type: i64 = self.tokens.parse(SECTION, "file type")?;
        if file_type != 0 {
            return Err(MeshError::malformed(
                SECTION,
                "binary .msh files are not supported",
            ));
        }
        // data size, unused for ASCII files
        self.tokens
            .next_token()
            .ok_or_else(|| MeshError::malformed(SECTION, "missing data size"))?;
        log::debug!("gmsh format version {raw}");
        self.data.version = Some(raw.to_string());
        Ok(())
    }

    fn physical_names(&mut self) -> Result<(), MeshError> {
        const SECTION: &str = "PhysicalNames";
        let count: usize = self.tokens.parse(SECTION, "physical name count")?;
        for _ in 0..count {
            let dimension: i64 = self.tokens.parse(SECTION, "physical dimension")?;
            let id: i64 = self.tokens.parse(SECTION, "physical id")?;
            let name = self
                .tokens
                .next_quoted()
                .ok_or_else(|| MeshError::malformed(SECTION, "missing physical name"))?;
            self.data.physical_groups.insert(id, dimension, name);
        }
        log::debug!("read {count} physical names");
        Ok(())
    }

    fn nodes(&mut self) -> Result<(), MeshError> {
        const SECTION: &str = "Nodes";
        let count: usize = self.tokens.parse(SECTION, "node count")?;
        for _ in 0..count {
            let id = self.tokens.parse_id(SECTION, "node id")?;
            let x: f64 = self.tokens.parse(SECTION, "x coordinate")?;
            let y: f64 = self.tokens.parse(SECTION, "y coordinate")?;
            let z: f64 = self.tokens.parse(SECTION, "z coordinate")?;
            self.data.nodes.push(Node {
                id,
                coordinates: [x, y, z],
            });
        }
        log::debug!("read {count} nodes");
        Ok(())
    }

    fn elements(&mut self) -> Result<(), MeshError> {
        const SECTION: &str = "Elements";
        let count: usize = self.tokens.parse(SECTION, "element count")?;
        for _ in 0..count {
            let element = self.element()?;
            if let Some(p) = element.ownership.max_partition() {
                self.data.partition_count = self.data.partition_count.max(p);
            }
            self.data.interfaces.record_element(&element);

            let groups = &self.data.physical_groups;
            if !groups.contains(element.physical) && self.undeclared.insert(element.physical) {
                log::warn!(
                    "physical id {} is not declared in $PhysicalNames, using {:?}",
                    element.physical,
                    groups.name(element.physical)
                );
            }
            let name = groups.name(element.physical).into_owned();
            self.data.mesh.push(name, element);
        }
        log::debug!("read {count} elements");
        Ok(())
    }

    fn element(&mut self) -> Result<Element, MeshError> {
        const SECTION: &str = "Elements";
        let id = self.tokens.parse_id(SECTION, "element id")?;
        let type_id: i64 = self.tokens.parse(SECTION, "element type")?;
        let element_type = ElementType::from_id(type_id)?;
        let tag_count: usize = self.tokens.parse(SECTION, "element tag count")?;
        let tags = (0..tag_count)
            .map(|_| self.tokens.parse::<i64>(SECTION, "element tag"))
            .collect::<Result<Vec<_>, _>>()?;
        let connectivity = (0..element_type.node_count())
            .map(|_| self.tokens.parse_id(SECTION, "element node id"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Element {
            id,
            element_type,
            physical: tags.first().copied().unwrap_or(0),
            entity: tags.get(1).copied().unwrap_or(0),
            ownership: Ownership::from_tags(&tags)?,
            connectivity,
        })
    }
}
