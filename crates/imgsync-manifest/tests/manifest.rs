use std::time::Duration;

use imgsync_manifest::{DEFAULT_HOOK_TIMEOUT, Manifest, ManifestError};

const VALID: &str = r#"
apiVersion: imgsync.dev/v1alpha1
kind: ImageManifest
metadata:
  name: lab-images
spec:
  images:
    - name: debian-12
      source:
        url: https://cloud.debian.org/images/debian-12.qcow2.xz
        checksum: sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa
        decompress: xz
      destination: debian/debian-12.qcow2
      validation:
        algorithm: sha256
        expected: sha256:bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb
      hooks:
        transform:
          - name: inject-keys
            command: ./scripts/inject.sh
            args: ["--user", "lab"]
            timeout: 10m
            inputs: ["scripts/*.sh", "keys/*.pub"]
        preUpload:
          - name: boot-test
            command: ./scripts/boot.sh
            workDir: /tmp
    - name: alpine
      source:
        url: https://dl-cdn.alpinelinux.org/alpine.iso
        checksum: sha512:cccc
      destination: alpine/alpine.iso
"#;

#[test]
fn parses_valid_manifest() {
    let m = Manifest::parse(VALID).unwrap();
    assert_eq!(m.metadata.name, "lab-images");
    assert_eq!(m.artifacts().len(), 2);

    let debian = m.find("debian-12").unwrap();
    assert_eq!(debian.source.decompress.as_deref(), Some("xz"));
    assert_eq!(debian.base_checksum(), debian.validation.as_ref().unwrap().expected);

    let inject = &debian.hooks.transform[0];
    assert_eq!(inject.args, vec!["--user", "lab"]);
    assert_eq!(inject.inputs.len(), 2);
    assert_eq!(inject.timeout().unwrap(), Duration::from_secs(600));

    let boot = &debian.hooks.pre_upload[0];
    assert_eq!(boot.timeout().unwrap(), DEFAULT_HOOK_TIMEOUT);
    assert_eq!(boot.work_dir.as_deref(), Some(std::path::Path::new("/tmp")));

    let alpine = m.find("alpine").unwrap();
    assert_eq!(alpine.base_checksum(), "sha512:cccc");
    assert!(alpine.hooks.is_empty());
    assert!(m.find("missing").is_none());
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("images.yaml");
    std::fs::write(&path, VALID).unwrap();
    assert_eq!(Manifest::load(&path).unwrap().artifacts().len(), 2);
}

#[test]
fn load_missing_file_names_path() {
    let err = Manifest::load("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ManifestError::Read { .. }));
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn malformed_yaml_is_parse_error() {
    assert!(matches!(Manifest::parse("spec: [unterminated"), Err(ManifestError::Parse(_))));
}

#[test]
fn collects_every_issue() {
    let data = r#"
apiVersion: v0
kind: Something
metadata:
  name: ""
spec:
  images:
    - name: insecure
      source:
        url: http://example.com/a.img
        checksum: sha256:aa
        decompress: bzip2
      destination: ""
      validation:
        algorithm: md5
        expected: ""
      hooks:
        preUpload:
          - name: ""
            command: ""
            timeout: soon
"#;
    let issues = Manifest::parse_raw(data).unwrap().validate_all();
    let joined = issues.join("\n");

    for needle in [
        "unsupported apiVersion",
        "unsupported kind",
        "metadata.name is required",
        "source.url must use HTTPS",
        "destination is required",
        "unsupported decompression format 'bzip2'",
        "validation.expected is required when decompress is used",
        "unsupported validation algorithm \"md5\"",
        "hooks.preUpload[0]: name is required",
        "hooks.preUpload[0]: command is required",
        "invalid timeout 'soon'",
    ] {
        assert!(joined.contains(needle), "missing {needle:?} in:\n{joined}");
    }
    assert!(issues.iter().all(|i| !i.starts_with("image[0]") || i.contains("\"insecure\"")));
}

#[test]
fn missing_checksum_is_reported() {
    let data = VALID.replace(
        "checksum: sha512:cccc",
        "checksum: \"\"",
    );
    let err = Manifest::parse(&data).unwrap_err();
    assert!(err.to_string().contains("source.checksum is required"));
}

#[test]
fn mismatched_validation_algorithm_is_reported() {
    let data = VALID.replace("algorithm: sha256", "algorithm: sha512");
    let issues = Manifest::parse_raw(&data).unwrap().validate_all();
    assert!(issues.iter().any(|i| i.contains("validation.algorithm is sha512")));
}

#[test]
fn scratch_directory_collision_is_reported() {
    let data = VALID.replace("name: boot-test", "name: \"inject keys\"").replace(
        "name: inject-keys",
        "name: inject_keys",
    );
    let m = Manifest::parse_raw(&data).unwrap();
    let debian = m.find("debian-12").unwrap();
    assert_eq!(debian.scratch_collisions().len(), 1);
    assert_eq!(debian.scratch_collisions()[0].0, "inject_keys");

    let err = m.validate().unwrap_err();
    assert!(err.to_string().contains("share the scratch directory"));
}

#[test]
fn same_hook_name_reused_is_not_a_collision() {
    let data = VALID.replace("name: boot-test", "name: inject-keys");
    let m = Manifest::parse(&data).unwrap();
    assert!(m.find("debian-12").unwrap().scratch_collisions().is_empty());
}
