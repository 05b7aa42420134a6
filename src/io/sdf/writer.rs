use crate::io::{Format, error::Error};
use crate::model::molecule::{Molecule, Structure};
use std::io::Write;

/// Writes one record: the molfile block titled with the molecule name, its
/// data items, and the `$$$$` terminator.
pub fn write<W: Write>(writer: &mut W, molecule: &Molecule) -> Result<(), Error> {
    let Structure::Molfile(molfile) = &molecule.structure else {
        return Err(Error::NotationMismatch {
            format: Format::Sdf,
            notation: molecule.notation(),
        });
    };

    writeln!(writer, "{}", molecule.name)?;
    for line in molfile.body() {
        writeln!(writer, "{line}")?;
    }
    if !molfile.block.lines().any(|l| l.starts_with("M  END")) {
        writeln!(writer, "M  END")?;
    }

    for (name, value) in &molecule.properties {
        writeln!(writer, "> <{name}>")?;
        for line in value.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "$$$$")?;
    Ok(())
}
