use papyrus::domain::{JobId, StoragePath};

#[test]
fn given_job_id_and_filename_when_creating_upload_path_then_format_is_uuid_underscore_filename() {
    let job_id = JobId::new();
    let path = StoragePath::for_upload(&job_id, "invoice.pdf");

    let expected = format!("{}_invoice.pdf", job_id.as_uuid());
    assert_eq!(path.as_str(), expected);
}

#[test]
fn given_two_jobs_with_same_filename_when_creating_upload_paths_then_paths_differ() {
    let path_a = StoragePath::for_upload(&JobId::new(), "scan.png");
    let path_b = StoragePath::for_upload(&JobId::new(), "scan.png");

    assert_ne!(path_a, path_b);
}

#[test]
fn given_traversal_filename_when_creating_upload_path_then_path_stays_flat() {
    let job_id = JobId::new();
    let path = StoragePath::for_upload(&job_id, "../../etc/passwd");

    assert!(!path.as_str().contains('/'));
    assert!(!path.as_str().contains('\\'));
    assert!(path.as_str().starts_with(&job_id.as_uuid().to_string()));
    assert!(path.as_str().ends_with("etc_passwd"));
}

#[test]
fn given_job_id_when_creating_artifact_path_then_format_is_uuid_dot_txt() {
    let job_id = JobId::new();
    let path = StoragePath::for_artifact(&job_id);

    assert_eq!(path.as_str(), format!("{}.txt", job_id.as_uuid()));
}

#[test]
fn given_storage_path_when_displayed_then_matches_as_str() {
    let path = StoragePath::for_upload(&JobId::new(), "page one.tiff");

    assert_eq!(format!("{}", path), path.as_str());
    assert!(path.as_str().ends_with("_page_one.tiff"));
}
