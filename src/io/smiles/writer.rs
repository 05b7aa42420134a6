use crate::io::{Format, SmilesOptions, error::Error};
use crate::model::molecule::{Molecule, Structure};
use std::io::Write;

/// Writes one tab-separated line: SMILES, then the name and the configured
/// property columns (empty when a property is absent).
pub fn write<W: Write>(
    writer: &mut W,
    molecule: &Molecule,
    options: &SmilesOptions,
) -> Result<(), Error> {
    let Structure::Smiles(smiles) = &molecule.structure else {
        return Err(Error::NotationMismatch {
            format: Format::Smiles,
            notation: molecule.notation(),
        });
    };

    write!(writer, "{smiles}")?;
    if options.names {
        write!(writer, "\t{}", molecule.name)?;
    }
    for column in &options.columns {
        let value = molecule.property(column).unwrap_or("");
        write!(writer, "\t{}", value.replace(['\t', '\n'], " "))?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_name_and_property_columns() {
        let mut mol = Molecule::from_smiles("c1ccccc1O", "phenol");
        mol.set_property("B", "2");
        mol.set_property("A", "line1\nline2");

        let options = SmilesOptions {
            names: true,
            columns: vec!["A".into(), "B".into(), "MISSING".into()],
        };
        let mut buf = Vec::new();
        write(&mut buf, &mol, &options).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "c1ccccc1O\tphenol\tline1 line2\t2\t\n"
        );
    }

    #[test]
    fn bare_smiles_without_names() {
        let mol = Molecule::from_smiles("CC", "ethane");
        let mut buf = Vec::new();
        write(&mut buf, &mol, &SmilesOptions::default()).unwrap();
        assert_eq!(buf, b"CC\n");
    }
}
