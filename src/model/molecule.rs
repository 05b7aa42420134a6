use std::fmt;

use super::smiles;

/// Line notation or connection table a molecule is carried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Molfile,
    Smiles,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Molfile => write!(f, "molfile"),
            Notation::Smiles => write!(f, "SMILES"),
        }
    }
}

/// An MDL V2000 connection table together with the raw block it was read from.
///
/// `block` holds every line from the title line through `M  END`, joined by
/// `\n` without a trailing newline. `atoms` and `bonds` are the parsed
/// element symbols and zero-based bond endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molfile {
    pub block: String,
    pub atoms: Vec<String>,
    pub bonds: Vec<(usize, usize)>,
}

impl Molfile {
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|s| !is_hydrogen(s)).count()
    }

    /// Number of independent rings: `bonds - atoms + components`.
    pub fn ring_count(&self) -> usize {
        let n = self.atoms.len();
        if n == 0 {
            return 0;
        }

        let mut parent: Vec<usize> = (0..n).collect();
        let mut components = n;
        for &(a, b) in &self.bonds {
            if a >= n || b >= n {
                continue;
            }
            let ra = find(&mut parent, a);
            let rb = find(&mut parent, b);
            if ra != rb {
                parent[ra] = rb;
                components -= 1;
            }
        }

        (self.bonds.len() + components).saturating_sub(n)
    }

    /// Lines of the block after the title line.
    pub fn body(&self) -> impl Iterator<Item = &str> {
        self.block.lines().skip(1)
    }
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn is_hydrogen(symbol: &str) -> bool {
    matches!(symbol, "H" | "D" | "T")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    Molfile(Molfile),
    Smiles(String),
}

/// One input record: a name, its structure and ordered data properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molecule {
    pub name: String,
    pub structure: Structure,
    pub properties: Vec<(String, String)>,
}

impl Molecule {
    pub fn from_smiles(smiles: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structure: Structure::Smiles(smiles.into()),
            properties: Vec::new(),
        }
    }

    pub fn from_molfile(molfile: Molfile, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structure: Structure::Molfile(molfile),
            properties: Vec::new(),
        }
    }

    pub fn notation(&self) -> Notation {
        match self.structure {
            Structure::Molfile(_) => Notation::Molfile,
            Structure::Smiles(_) => Notation::Smiles,
        }
    }

    /// The structure as text, in its own notation.
    pub fn structure_text(&self) -> &str {
        match &self.structure {
            Structure::Molfile(m) => &m.block,
            Structure::Smiles(s) => s,
        }
    }

    pub fn heavy_atom_count(&self) -> usize {
        match &self.structure {
            Structure::Molfile(m) => m.heavy_atom_count(),
            Structure::Smiles(s) => smiles::count(s).map(|c| c.heavy_atoms).unwrap_or(0),
        }
    }

    pub fn ring_count(&self) -> usize {
        match &self.structure {
            Structure::Molfile(m) => m.ring_count(),
            Structure::Smiles(s) => smiles::count(s).map(|c| c.rings).unwrap_or(0),
        }
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a property, replacing an existing value in place.
    pub fn set_property(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.properties.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.properties.push((name.to_string(), value)),
        }
    }
}
