//! CLI command for building a distribution from track archives

use std::path::Path;
use std::time::Instant;

use crate::archive::{ArchiveRecord, find_track_files, scan_files};
use crate::cli::progress::{DISK, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};
use crate::codec::Format;

pub fn execute(
    dir: &Path,
    config: Option<&Path>,
    base: Option<&Path>,
    format: Format,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut distrib = super::new_distribution(config)?;
    if let Some(base) = base {
        super::load_into(&mut distrib, base, None)?;
    }

    print_step(1, 3, LOOKING_GLASS, &format!("Scanning {}...", dir.display()));
    let files = find_track_files(dir)?;
    if files.is_empty() {
        anyhow::bail!("No track archives found in {}", dir.display());
    }

    let scans = if quiet {
        scan_files(&files, |_| {})
    } else {
        let pb = simple_bar(files.len() as u64, "Hashing");
        let scans = scan_files(&files, |progress| {
            pb.set_position(progress.current as u64);
        });
        pb.finish_and_clear();
        scans
    };

    print_step(2, 3, PACKAGE, &format!("Committing {} archives...", scans.len()));
    for scan in &scans {
        distrib.import_archive_record(ArchiveRecord::from_scan(scan));
    }
    let stats = distrib.commit_archive()?;
    eprintln!(
        "  {} tracks committed, {} groups, {} dissolved, {} discarded",
        stats.committed, stats.groups, stats.dissolved, stats.discarded
    );

    print_step(3, 3, DISK, &format!("Writing {format} output..."));
    let data = format.export(&mut distrib)?;
    super::write_output(&data, output)?;

    print_done(started.elapsed());
    Ok(())
}
