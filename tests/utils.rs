use mer_uploader::utils::path::{expand_tilde, remote_file_path};

#[test]
fn test_remote_path_with_trailing_slash() {
    assert_eq!(
        remote_file_path("/FROM_WEBSITE/", "orders20240501.mer"),
        "/FROM_WEBSITE/orders20240501.mer"
    );
}

#[test]
fn test_remote_path_without_trailing_slash() {
    assert_eq!(
        remote_file_path("/incoming", "orders.mer"),
        "/incoming/orders.mer"
    );
}

#[test]
fn test_remote_path_empty_directory() {
    assert_eq!(remote_file_path("", "orders.mer"), "orders.mer");
}

#[test]
fn test_expand_tilde_leaves_absolute_paths() {
    assert_eq!(expand_tilde("/var/exports"), "/var/exports");
}

#[test]
fn test_expand_tilde_home_prefix() {
    let home = dirs::home_dir().unwrap();
    assert_eq!(
        expand_tilde("~/Downloads"),
        format!("{}/Downloads", home.display())
    );
}
