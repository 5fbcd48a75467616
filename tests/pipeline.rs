//! End-to-end pipeline tests with injected privilege seams.

mod common;

use common::{APP, FakeElevation, FakeResponse, FixedAccess, entries, write_artifact};
use ssbt_installer::installer::settings::{DEFAULT_TARGET_DIR, UNKNOWN_VERSION};
use ssbt_installer::installer::{
    Access, ErrorKind, HostInfo, InstallRequest, Installer, Interrupt, OsFamily, OutputManager,
    ScopedWorkspace, run_interruptible,
};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

struct Fixture {
    source: tempfile::TempDir,
    target: tempfile::TempDir,
    temp_root: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            source: tempfile::tempdir().unwrap(),
            target: tempfile::tempdir().unwrap(),
            temp_root: tempfile::tempdir().unwrap(),
        }
    }

    fn request(&self, search_path: Option<&Path>) -> InstallRequest {
        self.request_with_path(search_path.map(|p| p.as_os_str().to_os_string()))
    }

    fn request_with_path(&self, search_path: Option<OsString>) -> InstallRequest {
        InstallRequest::builder()
            .source_directory(self.source.path())
            .target_directory(self.target.path())
            .version_label(Some("2.1.0".into()))
            .search_path(search_path)
            .working_directory(self.source.path())
            .build()
            .unwrap()
    }

    fn workspace(&self) -> ScopedWorkspace {
        ScopedWorkspace::acquire_in(self.temp_root.path()).unwrap()
    }
}

fn installer(
    output: OutputManager,
    access: Access,
    response: FakeResponse,
) -> (Installer, Arc<FakeElevation>) {
    let elevation = Arc::new(FakeElevation::new(response));
    let installer = Installer::new(output, elevation.clone(), "/opt/ssbt/ssbt-install".into())
        .with_access_probe(Arc::new(FixedAccess(access)));
    (installer, elevation)
}

#[test]
fn default_request_targets_usr_local_bin() {
    let request = InstallRequest::builder()
        .source_directory("/opt/ssbt")
        .version_label(None)
        .build()
        .unwrap();
    assert_eq!(request.target_directory(), Path::new(DEFAULT_TARGET_DIR));
    assert_eq!(request.target_path(), Path::new("/usr/local/bin/ssbt-tool"));
    assert_eq!(request.application_name(), APP);
    assert_eq!(request.version_label(), UNKNOWN_VERSION);
}

#[test]
fn blank_version_label_falls_back_to_unknown() {
    let request = InstallRequest::builder()
        .source_directory("/opt/ssbt")
        .version_label(Some("  ".into()))
        .build()
        .unwrap();
    assert_eq!(request.version_label(), "unknown");
}

#[tokio::test]
async fn linux_x86_64_writable_target_succeeds() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let (output, captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Writable, FakeResponse::Deny);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(Some(fx.target.path())),
            &HostInfo::new("x86_64", OsFamily::Linux),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert!(outcome.success, "{outcome:?}");
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.installed_path, Some(fx.target.path().join(APP)));
    assert_eq!(std::fs::read(fx.target.path().join(APP)).unwrap(), b"ssbt binary");
    assert!(elevation.calls().is_empty());

    let text = captured.contents();
    assert!(text.contains("Platform: linux-x86_64"), "{text}");
    assert!(text.contains(&format!("Target directory: {}", fx.target.path().display())));
    assert!(text.contains("Version: 2.1.0"));
    assert!(!text.contains("xattr"));
}

#[tokio::test]
async fn unsupported_architecture_stops_before_any_write() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let (output, captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Writable, FakeResponse::Grant);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(None),
            &HostInfo::new("riscv64", OsFamily::Linux),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.error, Some(ErrorKind::UnsupportedArchitecture));
    assert_ne!(outcome.exit_code(), 0);
    assert!(entries(fx.target.path()).is_empty());
    assert!(elevation.calls().is_empty());
    let text = captured.contents();
    assert!(text.contains("UnsupportedArchitecture"));
    assert!(text.contains("riscv64"));
    assert!(text.contains("hint: supply a build for a supported architecture"));
}

#[tokio::test]
async fn missing_binary_never_touches_target_or_elevation() {
    let fx = Fixture::new();
    let (output, _captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Denied, FakeResponse::Grant);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(None),
            &HostInfo::new("aarch64", OsFamily::Linux),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert_eq!(outcome.error, Some(ErrorKind::BinaryNotFound));
    assert_eq!(outcome.exit_code(), 3);
    assert!(entries(fx.target.path()).is_empty());
    assert!(elevation.calls().is_empty());
}

#[tokio::test]
async fn macos_arm64_denied_elevation_fails_without_writing() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let (output, captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Denied, FakeResponse::Deny);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(None),
            &HostInfo::new("arm64", OsFamily::MacOs),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert_eq!(outcome.error, Some(ErrorKind::PrivilegeDenied));
    assert_ne!(outcome.exit_code(), 0);
    assert_eq!(elevation.calls().len(), 1);
    assert!(entries(fx.target.path()).is_empty());
    assert!(captured.contents().contains("re-run with elevated privileges"));
}

#[tokio::test]
async fn macos_success_prints_quarantine_command_for_installed_path() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let (output, captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Denied, FakeResponse::Grant);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(Some(fx.target.path())),
            &HostInfo::new("arm64", OsFamily::MacOs),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert!(outcome.success, "{outcome:?}");
    assert_eq!(elevation.calls().len(), 1);
    let installed = fx.target.path().join(APP);
    let text = captured.contents();
    assert!(
        text.contains(&format!("xattr -d com.apple.quarantine {}", installed.display())),
        "{text}"
    );
    assert_eq!(text.matches("xattr -d").count(), 1);
}

#[tokio::test]
async fn shadowed_search_path_still_reports_the_installed_file() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let shadow = tempfile::tempdir().unwrap();
    let shadowing = write_artifact(shadow.path(), b"older ssbt");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&shadowing, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    let search_path = std::env::join_paths([shadow.path(), fx.target.path()]).unwrap();
    let (output, captured) = OutputManager::captured();
    let (installer, _) = installer(output, Access::Writable, FakeResponse::Deny);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request_with_path(Some(search_path)),
            &HostInfo::new("arm64", OsFamily::MacOs),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert!(outcome.success, "{outcome:?}");
    let installed = fx.target.path().join(APP);
    assert_eq!(outcome.installed_path.as_deref(), Some(installed.as_path()));
    let text = captured.contents();
    assert!(text.contains("shadows"), "{text}");
    assert!(text.contains(&format!("installed at {}", installed.display())), "{text}");
    assert!(
        text.contains(&format!("xattr -d com.apple.quarantine {}", installed.display())),
        "{text}"
    );
    assert!(!text.contains(&format!("installed at {}", shadowing.display())), "{text}");
    assert!(!text.contains(&format!("quarantine {}", shadowing.display())), "{text}");
}

#[tokio::test]
async fn binary_missing_from_search_path_is_only_a_warning() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let elsewhere = tempfile::tempdir().unwrap();
    let (output, captured) = OutputManager::captured();
    let (installer, _) = installer(output, Access::Writable, FakeResponse::Deny);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(Some(elsewhere.path())),
            &HostInfo::new("x86_64", OsFamily::Linux),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.exit_code(), 0);
    let text = captured.contents();
    assert!(text.contains("not reachable via PATH"), "{text}");
    assert!(text.contains(&format!("installed at {}", fx.target.path().join(APP).display())));
}

#[tokio::test]
async fn workspace_is_removed_after_success_and_failure() {
    for raw_arch in ["x86_64", "sparc"] {
        let fx = Fixture::new();
        write_artifact(fx.source.path(), b"ssbt binary");
        let (output, _captured) = OutputManager::captured();
        let (installer, _) = installer(output, Access::Writable, FakeResponse::Deny);
        let workspace = fx.workspace();
        let workspace_path = workspace.path().to_path_buf();
        assert!(workspace_path.is_dir());

        installer
            .run(
                &fx.request(None),
                &HostInfo::new(raw_arch, OsFamily::Linux),
                &workspace,
            )
            .await;
        workspace.release().unwrap();

        assert!(!workspace_path.exists(), "{raw_arch}");
        assert!(entries(fx.temp_root.path()).is_empty());
    }
}

#[test]
fn dropped_workspace_is_removed() {
    let root = tempfile::tempdir().unwrap();
    let path = {
        let workspace = ScopedWorkspace::acquire_in(root.path()).unwrap();
        std::fs::write(workspace.path().join("scratch"), b"x").unwrap();
        workspace.path().to_path_buf()
    };
    assert!(!path.exists());
}

#[tokio::test]
async fn triggered_interrupt_stops_before_any_stage() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), b"ssbt binary");
    let interrupt = Interrupt::new();
    interrupt.trigger();
    let (output, captured) = OutputManager::captured();
    let (installer, elevation) = installer(output, Access::Denied, FakeResponse::Grant);
    let installer = installer.with_interrupt(interrupt);
    let workspace = fx.workspace();

    let outcome = installer
        .run(
            &fx.request(None),
            &HostInfo::new("x86_64", OsFamily::Linux),
            &workspace,
        )
        .await;
    workspace.release().unwrap();

    assert_eq!(outcome.error, Some(ErrorKind::Interrupted));
    assert_eq!(outcome.exit_code(), 130);
    assert!(entries(fx.target.path()).is_empty());
    assert!(elevation.calls().is_empty());
    assert!(captured.contents().contains("Interrupted"));
}

#[tokio::test]
async fn signal_mid_run_waits_for_the_pipeline_and_leaves_no_partial_file() {
    let fx = Fixture::new();
    write_artifact(fx.source.path(), &vec![3u8; 256 * 1024]);
    let interrupt = Interrupt::new();
    let (output, captured) = OutputManager::captured();
    let (installer, _elevation) = installer(
        output,
        Access::Denied,
        FakeResponse::PlaceOnceInterrupted(interrupt.clone()),
    );
    let installer = installer.with_interrupt(interrupt.clone());
    let workspace = fx.workspace();
    let request = fx.request(None);
    let host = HostInfo::new("aarch64", OsFamily::Linux);

    let (outcome, signal) = run_interruptible(
        installer.run(&request, &host, &workspace),
        &interrupt,
        async { "SIGINT" },
    )
    .await;
    workspace.release().unwrap();

    assert_eq!(signal, Some("SIGINT"));
    assert!(interrupt.is_triggered());
    assert_eq!(outcome.error, Some(ErrorKind::Interrupted), "{outcome:?}");
    assert!(entries(fx.target.path()).is_empty());
    assert!(entries(fx.temp_root.path()).is_empty());
    assert!(captured.contents().contains("hint: run the installer again"));
}

#[tokio::test]
async fn finished_work_is_returned_without_a_signal() {
    let interrupt = Interrupt::new();

    let (value, signal) =
        run_interruptible(async { 7 }, &interrupt, std::future::pending::<&'static str>()).await;

    assert_eq!(value, 7);
    assert_eq!(signal, None);
    assert!(!interrupt.is_triggered());
}
