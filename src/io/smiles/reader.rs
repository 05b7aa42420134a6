use crate::io::{Format, error::Error};
use crate::model::molecule::Molecule;
use crate::model::smiles;
use std::io::BufRead;

/// Streams `SMILES [name]` lines. Blank lines are skipped.
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
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Molecule, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        while !self.done {
            buf.clear();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line_no += 1;
                    let Ok(line) = std::str::from_utf8(&buf) else {
                        return Some(Err(Error::parse(
                            Format::Smiles,
                            self.line_no,
                            "line is not valid UTF-8",
                        )));
                    };
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(parse_line(line, self.line_no));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }
}

pub fn parse_line(line: &str, line_no: usize) -> Result<Molecule, Error> {
    let (smi, name) = match line.split_once(char::is_whitespace) {
        Some((smi, rest)) => (smi, rest.trim()),
        None => (line, ""),
    };

    smiles::count(smi).map_err(|e| Error::parse(Format::Smiles, line_no, e.to_string()))?;

    Ok(Molecule::from_smiles(smi, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> Vec<Result<Molecule, Error>> {
        Records::new(text.as_bytes()).collect()
    }

    #[test]
    fn reads_smiles_and_names() {
        let mols = read_all("CCO ethanol\n\nc1ccccc1\tbenzene ring\nC\n");
        let mols: Vec<_> = mols.into_iter().map(|m| m.unwrap()).collect();

        assert_eq!(mols.len(), 3);
        assert_eq!(mols[0].structure_text(), "CCO");
        assert_eq!(mols[0].name, "ethanol");
        assert_eq!(mols[1].name, "benzene ring");
        assert_eq!(mols[2].name, "");
    }

    #[test]
    fn invalid_line_reports_line_number_and_reading_resumes() {
        let items = read_all("CCO a\nC1CC b\nCC c\n");
        assert_eq!(items.len(), 3);
        match &items[1] {
            Err(Error::Parse { format, line, .. }) => {
                assert_eq!(*format, Format::Smiles);
                assert_eq!(*line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(items[2].as_ref().unwrap().name, "c");
    }

    #[test]
    fn undecodable_line_is_reported_and_reading_resumes() {
        let items: Vec<_> = Records::new(&b"CCO a\nC\xff bad\nCCN b\n"[..]).collect();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[1], Err(Error::Parse { line: 2, .. })));
        assert!(items[1].as_ref().unwrap_err().is_record_error());
        assert_eq!(items[2].as_ref().unwrap().name, "b");
    }

    #[test]
    fn handles_crlf_line_endings() {
        let mols = read_all("CCN amine\r\n");
        assert_eq!(mols[0].as_ref().unwrap().name, "amine");
    }
}
