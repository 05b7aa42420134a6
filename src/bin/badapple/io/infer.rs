use std::path::Path;

use badapple::ANNOTATION_FIELDS;
use badapple::io::{Format, OutputFormat, SmilesOptions};

pub fn input(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "sdf" | "sd" | "mol" => Some(Format::Sdf),
        "smi" | "smiles" | "ism" | "can" => Some(Format::Smiles),
        _ => None,
    }
}

/// Output format for a path. SMILES output always carries the molecule name
/// followed by the Badapple annotation columns.
pub fn output(path: &Path) -> Option<OutputFormat> {
    match input(path)? {
        Format::Sdf => Some(OutputFormat::Sdf),
        Format::Smiles => Some(OutputFormat::Smiles(SmilesOptions {
            names: true,
            columns: ANNOTATION_FIELDS.iter().map(|f| f.to_string()).collect(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a.SDF", Some(Format::Sdf))]
    #[case("a.sd", Some(Format::Sdf))]
    #[case("a.mol", Some(Format::Sdf))]
    #[case("dir.v2/a.ism", Some(Format::Smiles))]
    #[case("a.can", Some(Format::Smiles))]
    #[case("a.mol2", None)]
    #[case("noext", None)]
    fn extensions_map_to_formats(#[case] path: &str, #[case] expected: Option<Format>) {
        assert_eq!(input(Path::new(path)), expected);
    }

    #[test]
    fn smiles_output_lists_name_and_annotations() {
        let Some(OutputFormat::Smiles(opts)) = output(Path::new("out.smi")) else {
            panic!("expected SMILES output");
        };
        assert!(opts.names);
        assert_eq!(opts.columns.len(), ANNOTATION_FIELDS.len());
        assert_eq!(output(Path::new("out.sdf")), Some(OutputFormat::Sdf));
    }
}
