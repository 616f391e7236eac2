//! `.tar.gz` writer and generated metadata files

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tar::Builder as TarBuilder;

use crate::error::{SfpError, Result};
use crate::models::PackageManifest;

use super::DistributionPlan;

/// A written distribution archive
#[derive(Debug, Clone, Serialize)]
pub struct BuiltDistribution {
    /// Path of the `.tar.gz`
    pub archive: PathBuf,
    /// Path of the `.sha256` sidecar
    pub checksum_file: PathBuf,
    /// Hex SHA-256 of the archive
    pub sha256: String,
    /// Number of entries written
    pub entries: usize,
}

/// Core metadata in `PKG-INFO` form, followed by the long description
pub fn pkg_info(manifest: &PackageManifest, long_description: &str) -> String {
    let info = &manifest.package;
    let mut lines = vec![
        "Metadata-Version: 2.1".to_string(),
        format!("Name: {}", info.name),
        format!("Version: {}", info.version),
    ];

    let optional = [
        ("Summary", &info.description),
        ("Home-page", &info.url),
        ("Author", &info.author),
        ("Author-email", &info.author_email),
        ("License", &info.license),
    ];
    for (field, value) in optional {
        if let Some(value) = value {
            lines.push(format!("{}: {}", field, value));
        }
    }

    lines.push(format!("License-File: {}", info.license_file));
    for req in &info.install_requires {
        lines.push(format!("Requires-Dist: {}", req));
    }
    lines.push(format!("Description-Content-Type: {}", info.readme_content_type));

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out.push_str(long_description);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// `entry_points.txt` in ini form
pub fn entry_points_txt(manifest: &PackageManifest) -> String {
    let scripts = &manifest.entry_points.console_scripts;
    if scripts.is_empty() {
        return String::new();
    }

    let mut out = String::from("[console_scripts]\n");
    for ep in scripts {
        out.push_str(&ep.to_string());
        out.push('\n');
    }
    out
}

/// Write `plan` as `<output_dir>/<dist_name>.tar.gz` plus its checksum
pub(super) fn write(
    manifest: &PackageManifest,
    plan: &DistributionPlan,
    root: &Path,
    output_dir: &Path,
) -> Result<BuiltDistribution> {
    fs::create_dir_all(output_dir)?;

    let archive_path = output_dir.join(format!("{}.tar.gz", plan.dist_name));
    let prefix = PathBuf::from(&plan.dist_name);
    let now = chrono::Utc::now().timestamp().max(0) as u64;

    // Written next to the target and renamed into place once complete
    let staging = tempfile::NamedTempFile::new_in(output_dir)?;
    let mut entries = 0;
    {
        let encoder = flate2::write::GzEncoder::new(
            BufWriter::new(staging.as_file()),
            flate2::Compression::default(),
        );
        let mut tar = TarBuilder::new(encoder);

        append_bytes(&mut tar, &prefix.join("PKG-INFO"), pkg_info(manifest, &plan.long_description).as_bytes(), now)?;
        entries += 1;

        let entry_points = entry_points_txt(manifest);
        if !entry_points.is_empty() {
            append_bytes(&mut tar, &prefix.join("entry_points.txt"), entry_points.as_bytes(), now)?;
            entries += 1;
        }

        for rel in plan.files() {
            let source = root.join(&rel);
            if !source.is_file() {
                return Err(SfpError::file_not_found(source));
            }
            append_file(&mut tar, &source, &prefix.join(&rel))?;
            entries += 1;
        }

        let encoder = tar.into_inner()?;
        encoder.finish()?.flush()?;
    }

    staging
        .persist(&archive_path)
        .map_err(|e| SfpError::Io(e.error))?;

    let sha256 = sha256_file(&archive_path)?;
    let checksum_file = PathBuf::from(format!("{}.sha256", archive_path.display()));
    let file_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    fs::write(&checksum_file, format!("{}  {}\n", sha256, file_name))?;

    Ok(BuiltDistribution {
        archive: archive_path,
        checksum_file,
        sha256,
        entries,
    })
}

fn sha256_file(path: &Path) -> Result<String> {
    let mut hasher = Sha256::new();
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Append in-memory content as a regular file
fn append_bytes<W: Write>(tar: &mut TarBuilder<W>, name: &Path, data: &[u8], mtime: u64) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(mtime);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();
    tar.append_data(&mut header, name, data)?;
    Ok(())
}

/// Append a file from disk, owned by root and keeping its mode
fn append_file<W: Write>(tar: &mut TarBuilder<W>, path: &Path, name: &Path) -> Result<()> {
    let metadata = path.metadata()?;
    let mut header = tar::Header::new_gnu();

    header.set_size(metadata.len());
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(
        metadata
            .modified()?
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        header.set_mode(metadata.permissions().mode());
    }
    #[cfg(not(unix))]
    {
        header.set_mode(0o644);
    }

    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();

    let file = File::open(path)?;
    tar.append_data(&mut header, name, file)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::DistributionBuilder;
    use crate::models::MANIFEST_FILE;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[test]
    fn test_pkg_info_fields() {
        let text = pkg_info(&PackageManifest::sfp(), "# sfp");
        assert!(text.starts_with("Metadata-Version: 2.1\nName: sfp\nVersion: 0.1\n"));
        assert!(text.contains("Summary: Una herramienta para ejecutar sfp.exe\n"));
        assert!(text.contains("License: Apache 2.0\n"));
        assert!(text.contains("Description-Content-Type: text/markdown\n\n# sfp\n"));
        assert!(!text.contains("Requires-Dist"));
    }

    #[test]
    fn test_entry_points_txt() {
        assert_eq!(
            entry_points_txt(&PackageManifest::sfp()),
            "[console_scripts]\nsfp = simple_fast_project.main:run\n"
        );
        let mut manifest = PackageManifest::sfp();
        manifest.entry_points.console_scripts.clear();
        assert_eq!(entry_points_txt(&manifest), "");
    }

    #[test]
    fn test_build_archive() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("README.md"), "readme").unwrap();
        fs::write(root.join("LICENSE.md"), "license").unwrap();
        fs::create_dir(root.join("simple_fast_project")).unwrap();
        fs::write(root.join("simple_fast_project/__init__.py"), "").unwrap();
        fs::write(root.join("simple_fast_project/sfp.exe"), b"MZ").unwrap();
        PackageManifest::sfp().write(&root.join(MANIFEST_FILE), false).unwrap();

        let out = root.join("dist");
        let built = DistributionBuilder::new(PackageManifest::sfp(), root)
            .unwrap()
            .exclude(&out)
            .build(&out)
            .unwrap();

        assert_eq!(built.archive, out.join("sfp-0.1.tar.gz"));
        assert_eq!(built.sha256.len(), 64);
        let sidecar = fs::read_to_string(&built.checksum_file).unwrap();
        assert_eq!(sidecar, format!("{}  sfp-0.1.tar.gz\n", built.sha256));

        let mut archive = tar::Archive::new(GzDecoder::new(File::open(&built.archive).unwrap()));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().display().to_string())
            .collect();

        assert_eq!(built.entries, names.len());
        for expected in [
            "sfp-0.1/PKG-INFO",
            "sfp-0.1/entry_points.txt",
            "sfp-0.1/package.toml",
            "sfp-0.1/README.md",
            "sfp-0.1/LICENSE.md",
            "sfp-0.1/simple_fast_project/__init__.py",
            "sfp-0.1/simple_fast_project/sfp.exe",
        ] {
            assert!(names.iter().any(|n| n == expected), "{} missing from {:?}", expected, names);
        }
    }
}
