use crate::io::{Format, error::Error};
use crate::model::molecule::{Molecule, Molfile};
use std::io::BufRead;

/// Streams `$$$$`-terminated records out of an SD file.
///
/// A whole record is buffered before it is parsed, so a malformed record is
/// reported once and the next call starts cleanly at the following record.
pub struct Records<R> {
    reader: R,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            done: false,
        }
    }

    /// Reads up to and including the next `$$$$`. A line that is not UTF-8
    /// fails the record once the whole record has been consumed.
    fn next_block(&mut self) -> Result<Option<Vec<(usize, String)>>, Error> {
        let mut lines = Vec::new();
        let mut undecodable = None;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let n = self.reader.read_until(b'\n', &mut buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            self.line_no += 1;
            let Ok(text) = std::str::from_utf8(&buf) else {
                undecodable.get_or_insert(self.line_no);
                continue;
            };
            let content = text.trim_end_matches(['\n', '\r']);
            if content.trim() == "$$$$" {
                break;
            }
            lines.push((self.line_no, content.to_string()));
        }

        if let Some(line) = undecodable {
            return Err(Error::parse(Format::Sdf, line, "line is not valid UTF-8"));
        }
        if lines.iter().all(|(_, l)| l.trim().is_empty()) {
            return Ok(None);
        }
        Ok(Some(lines))
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Molecule, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_block() {
                Ok(Some(lines)) => return Some(parse_record(&lines)),
                Ok(None) => continue,
                Err(e) => {
                    if !e.is_record_error() {
                        self.done = true;
                    }
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

pub fn parse_record(lines: &[(usize, String)]) -> Result<Molecule, Error> {
    let (molfile, end) = parse_ctab(lines)?;
    let name = lines[0].1.trim().to_string();
    let mut molecule = Molecule::from_molfile(molfile, name);
    molecule.properties = parse_data_items(&lines[end..])?;
    Ok(molecule)
}

/// Parses a bare molfile block (no data items, no `$$$$`).
pub fn parse_molfile(text: &str) -> Result<Molfile, Error> {
    let lines: Vec<(usize, String)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r').to_string()))
        .collect();
    parse_ctab(&lines).map(|(m, _)| m)
}

/// Returns the connection table and the index of the first line after it.
fn parse_ctab(lines: &[(usize, String)]) -> Result<(Molfile, usize), Error> {
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            lines.first().map(|(ln, _)| *ln).unwrap_or(1),
            "molfile must contain a header block and a counts line",
        ));
    }

    let (counts_line_no, counts_line) = (&lines[3].0, &lines[3].1);
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            *counts_line_no,
            "V3000 is not supported",
        ));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, *counts_line_no)?;
    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    let bond_end = bond_start + bond_count;

    if lines.len() < bond_end {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(*counts_line_no),
            "record ended before atoms/bonds were fully specified",
        ));
    }

    let atoms = parse_atoms(&lines[atom_start..bond_start])?;
    let bonds = parse_bonds(&lines[bond_start..bond_end], atom_count)?;

    let end = lines[bond_end..]
        .iter()
        .position(|(_, l)| l.starts_with("M  END"))
        .map(|off| bond_end + off + 1)
        .unwrap_or(bond_end);

    let block = lines[..end]
        .iter()
        .map(|(_, l)| l.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    Ok((
        Molfile {
            block,
            atoms,
            bonds,
        },
        end,
    ))
}

fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let atoms = field(line, 0, 3)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = field(line, 3, 6)
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn parse_atoms(lines: &[(usize, String)]) -> Result<Vec<String>, Error> {
    lines
        .iter()
        .map(|(ln, raw)| {
            let symbol = field(raw, 31, 34);
            if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::parse(Format::Sdf, *ln, "invalid atom symbol"));
            }
            Ok(symbol.to_string())
        })
        .collect()
}

fn parse_bonds(lines: &[(usize, String)], atom_count: usize) -> Result<Vec<(usize, usize)>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let a1 = field(raw, 0, 3)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid first atom index"))?;
        let a2 = field(raw, 3, 6)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid second atom index"))?;

        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }

        bonds.push((a1 - 1, a2 - 1));
    }
    Ok(bonds)
}

fn parse_data_items(lines: &[(usize, String)]) -> Result<Vec<(String, String)>, Error> {
    let mut items = Vec::new();
    let mut iter = lines.iter().peekable();

    while let Some((ln, line)) = iter.next() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with('>') {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "expected data item header ('> <NAME>')",
            ));
        }

        let name = data_item_name(line)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "data item header has no <NAME>"))?;

        let mut values = Vec::new();
        while let Some((_, value)) = iter.next_if(|(_, l)| !l.trim().is_empty()) {
            values.push(value.as_str());
        }
        items.push((name.to_string(), values.join("\n")));
    }

    Ok(items)
}

fn data_item_name(header: &str) -> Option<&str> {
    let open = header.find('<')?;
    let close = header[open + 1..].find('>')? + open + 1;
    Some(&header[open + 1..close])
}
