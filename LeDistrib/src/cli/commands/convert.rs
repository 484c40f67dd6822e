//! CLI interface for format conversion
use std::path::Path;

use crate::codec::Format;

pub fn execute(
    input: &Path,
    from: Option<Format>,
    to: Format,
    config: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let from = from.unwrap_or_else(|| Format::from_path(input));
    if !from.can_import() {
        anyhow::bail!("Format '{from}' cannot be read, only written");
    }

    let mut distrib = super::new_distribution(config)?;
    super::load_into(&mut distrib, input, Some(from))?;
    let data = to.export(&mut distrib)?;
    super::write_output(&data, output)
}
