//! Rendering of jump tables as C array initializers.
//!
//! Matrix tables nest as `{matrix{block{row{word, ...}}}}` with decimal
//! words. Polynomial tables hold one `{0x........u, ...}` group per entry,
//! least significant word first. Output depends only on the numeric values.

use std::io;

use crate::artifact::{JumpArtifact, JumpEntries, JumpTable};
use crate::packed::{PackedMatrix, PackedPoly};

fn braced<I: IntoIterator<Item = String>>(items: I) -> String {
    let items: Vec<String> = items.into_iter().collect();
    format!("{{{}}}", items.join(", "))
}

fn render_matrix(matrix: &PackedMatrix) -> String {
    let nb = matrix.word_bits() as usize;
    braced((0..matrix.words()).map(|block| {
        braced((0..nb).map(|row| braced(matrix.row(block, row).iter().map(u32::to_string))))
    }))
}

fn render_poly(poly: &PackedPoly) -> String {
    let width = (poly.word_bits() as usize).div_ceil(4) + 2;
    braced(
        poly.words()
            .iter()
            .map(|w| format!("{w:#0width$x}u", width = width)),
    )
}

/// Renders one table as a `static unsigned int const` declaration.
pub fn render_table(table: &JumpTable) -> String {
    let body = match &table.entries {
        JumpEntries::Matrix(entries) => braced(entries.iter().map(render_matrix)),
        JumpEntries::Poly(entries) => braced(entries.iter().map(render_poly)),
    };
    format!("static unsigned int const {}[] = {};", table.name, body)
}

/// Renders every table of the artifact, one declaration per line.
pub fn render_artifact(artifact: &JumpArtifact) -> String {
    let mut out = String::new();
    for table in &artifact.tables {
        out.push_str(&render_table(table));
        out.push('\n');
    }
    out
}

/// Writes the rendered artifact to `out`.
pub fn write_artifact<W: io::Write>(out: &mut W, artifact: &JumpArtifact) -> io::Result<()> {
    out.write_all(render_artifact(artifact).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Generator, GeneratorConfig};
    use crate::jump::JumpKind;

    fn artifact(kind: JumpKind, size: usize) -> JumpArtifact {
        let mut config = GeneratorConfig::default();
        config.kind = kind;
        config.size = size;
        Generator::new(config).unwrap().generate().unwrap()
    }

    #[test]
    fn poly_table_format() {
        let artifact = artifact(JumpKind::Poly, 2);
        let line = render_table(artifact.table("jump").unwrap());
        assert_eq!(
            line,
            "static unsigned int const jump[] = {\
             {0x00000002u, 0x00000000u, 0x00000000u, 0x00000000u, 0x00000000u}, \
             {0x00000010u, 0x00000000u, 0x00000000u, 0x00000000u, 0x00000000u}};"
        );
        let sub = render_table(artifact.table("jump_subsequence").unwrap());
        assert!(sub.starts_with(
            "static unsigned int const jump_subsequence[] = {\
             {0x26294934u, 0x77bbc248u, 0x1a87dad0u, 0x930052d4u, 0x947e6dd2u}, {"
        ));
    }

    #[test]
    fn matrix_table_format() {
        let artifact = artifact(JumpKind::Matrix, 1);
        let line = render_table(artifact.table("jump").unwrap());
        assert!(line.starts_with(
            "static unsigned int const jump[] = {{{{0, 0, 0, 0, 3758096384}, "
        ));
        assert!(line.contains("}}, {{2147483648, 0, 0, 0, 0}, "));
        assert!(line.ends_with("{0, 0, 0, 1, 17}}}};"));
        // 1 matrix * 5 blocks * 32 rows
        assert_eq!(line.matches("}, {").count() + 1, 160);
    }

    #[test]
    fn narrow_words_use_fewer_hex_digits() {
        use crate::poly::BitPoly;
        use xorwow_core::{Shifts, XorwowParams};

        let params = XorwowParams::new(4, 2, Shifts::new(1, 1, 1)).unwrap();
        let poly = PackedPoly::from_poly(&params, &BitPoly::monomial(5)).unwrap();
        assert_eq!(render_poly(&poly), "{0x0u, 0x2u}");
    }

    #[test]
    fn emission_is_deterministic() {
        let first = artifact(JumpKind::Poly, 4);
        let second = artifact(JumpKind::Poly, 4);
        assert_eq!(render_artifact(&first), render_artifact(&first));
        assert_eq!(render_artifact(&first), render_artifact(&second));

        let mut buf = Vec::new();
        write_artifact(&mut buf, &first).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), render_artifact(&first));
        assert_eq!(render_artifact(&first).lines().count(), 2);
        let rendered = render_artifact(&first);
        assert!(rendered.ends_with("};\n"));
        assert_eq!(rendered.matches('\n').count(), first.tables.len());
    }
}
