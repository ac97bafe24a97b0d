#[cfg(test)]
mod tests {
    use gop::bundler::{discover_artifacts, package_artifacts};
    use gop::config::{ProjectLayout, ReleaseContext, RunFlags};
    use std::fs::{self, File};
    use std::io::Read;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// A module with two cross-compiled binaries already in `bin/`
    fn project() -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path();
        write(&root.join("go.mod"), "module github.com/owner/repo\n\ngo 1.21\n");
        write(&root.join("CHANGELOG.md"), "# 1.0.0\nfix bug\n\n# 0.9.0\nold\n");
        write(&root.join("bin/repo-linux-amd64"), "elf");
        write(&root.join("bin/repo-windows-amd64.exe"), "pe");
        fs::create_dir_all(root.join("dist")).unwrap();
        temp_dir
    }

    fn context(root: &Path) -> ReleaseContext {
        let flags = RunFlags {
            package: true,
            ..Default::default()
        };
        ReleaseContext::load(ProjectLayout::new(root), flags).unwrap()
    }

    fn entries(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn read_entry(path: &Path, name: &str) -> String {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        contents
    }

    #[tokio::test]
    async fn test_package_with_vendor_and_project_licenses() {
        let temp_dir = project();
        let root = temp_dir.path();
        write(&root.join("LICENSE"), "MIT");
        write(&root.join("vendor/github.com/a/b/LICENSE"), "Apache");
        write(&root.join("vendor/github.com/a/b/examples/LICENSE"), "skipped");

        let ctx = context(root);
        let artifacts = discover_artifacts(&ctx.layout.bin_dir()).await.unwrap();
        let report = package_artifacts(&ctx, &artifacts).await.unwrap();

        assert!(report.has_project_license);
        assert_eq!(report.license_count, 2);
        assert!(report.collisions.is_empty());

        let names: Vec<String> = report.archives.iter().map(|a| a.file_name()).collect();
        assert_eq!(names, ["repo-linux-amd64.zip", "repo-windows-amd64.zip"]);

        let linux = root.join("dist/repo-linux-amd64.zip");
        assert_eq!(
            entries(&linux),
            [
                "licenses-and-notices/a-b-license",
                "licenses-and-notices/repo-license",
                "readme.txt",
                "repo",
            ]
        );
        assert_eq!(read_entry(&linux, "repo"), "elf");
        assert_eq!(read_entry(&linux, "licenses-and-notices/a-b-license"), "Apache");
        assert_eq!(read_entry(&linux, "licenses-and-notices/repo-license"), "MIT");
        assert_eq!(
            read_entry(&linux, "readme.txt"),
            "Thank you for downloading Repo\n\
             If you would like to contribute and/or download the source code, visit:\n\
             https://github.com/owner/repo\n"
        );

        let windows = root.join("dist/repo-windows-amd64.zip");
        assert!(entries(&windows).contains(&"repo.exe".to_string()));
        assert_eq!(read_entry(&windows, "repo.exe"), "pe");
    }

    #[tokio::test]
    async fn test_package_without_any_license() {
        let temp_dir = project();
        let root = temp_dir.path();

        let ctx = context(root);
        let artifacts = discover_artifacts(&ctx.layout.bin_dir()).await.unwrap();
        let report = package_artifacts(&ctx, &artifacts).await.unwrap();

        assert!(!report.has_project_license);
        assert_eq!(report.license_count, 0);
        assert_eq!(report.archives.len(), 2);
        assert_eq!(
            entries(&root.join("dist/repo-linux-amd64.zip")),
            ["readme.txt", "repo"]
        );
        assert_eq!(
            entries(&root.join("dist/repo-windows-amd64.zip")),
            ["readme.txt", "repo.exe"]
        );
        for archive in &report.archives {
            assert_eq!(archive.entries, 2);
            assert!(
                !entries(&archive.path)
                    .iter()
                    .any(|name| name.starts_with("licenses-and-notices/"))
            );
        }
    }

    #[tokio::test]
    async fn test_binary_keeps_executable_mode() {
        let temp_dir = project();
        let ctx = context(temp_dir.path());
        let artifacts = discover_artifacts(&ctx.layout.bin_dir()).await.unwrap();
        package_artifacts(&ctx, &artifacts).await.unwrap();

        let path = temp_dir.path().join("dist/repo-linux-amd64.zip");
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mode = archive.by_name("repo").unwrap().unix_mode().unwrap();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[tokio::test]
    async fn test_license_collision_is_reported() {
        let temp_dir = project();
        let root = temp_dir.path();
        write(&root.join("vendor/one/a/b/LICENSE"), "first");
        write(&root.join("vendor/two/a/b/LICENSE"), "second");

        let ctx = context(root);
        let artifacts = discover_artifacts(&ctx.layout.bin_dir()).await.unwrap();
        let report = package_artifacts(&ctx, &artifacts).await.unwrap();

        assert_eq!(report.collisions, ["a-b-license"]);
        let linux = root.join("dist/repo-linux-amd64.zip");
        assert_eq!(read_entry(&linux, "licenses-and-notices/a-b-license"), "second");
    }

    #[tokio::test]
    async fn test_empty_bin_yields_no_archives() {
        let temp_dir = project();
        let root = temp_dir.path();
        fs::remove_dir_all(root.join("bin")).unwrap();
        fs::create_dir_all(root.join("bin")).unwrap();

        let ctx = context(root);
        let artifacts = discover_artifacts(&ctx.layout.bin_dir()).await.unwrap();
        assert!(artifacts.is_empty());

        let report = package_artifacts(&ctx, &artifacts).await.unwrap();
        assert!(report.archives.is_empty());
        assert_eq!(fs::read_dir(root.join("dist")).unwrap().count(), 0);
    }
}
