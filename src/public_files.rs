use super::*;
use pencil::abort;
use pencil::helpers::send_from_directory_range;
use std::path::{Component, Path, PathBuf};

/// Only plain, relative paths to existing files under `public_dir` are served.
pub fn resolve(public_dir: &Path, requested: &str) -> Option<PathBuf> {
    let requested = Path::new(requested);
    if requested.as_os_str().is_empty() {
        return None;
    }
    let mut resolved = public_dir.to_path_buf();
    for component in requested.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            _ => return None,
        }
    }
    if resolved.is_file() {
        Some(resolved)
    } else {
        None
    }
}

fn serve(req: &mut Request, relative_path: &str) -> PencilResult {
    use pencil::{PencilError, HTTPError};

    if resolve(&*PUBLIC_DIR, relative_path).is_none() {
        return not_found(HTTPError::NotFound);
    }
    let public_dir = try_or!(PUBLIC_DIR.to_str(), else return internal_server_error(HTTPError::InternalServerError));

    send_from_directory_range(public_dir, relative_path, false, req.headers().get())
        .set_static_cache()
        .or_else(|e| match e {
            PencilError::PenHTTPError(HTTPError::NotFound) => not_found(HTTPError::NotFound),
            _ => Err(internal_error(e)),
        })
}

pub fn index(req: &mut Request) -> PencilResult {
    serve(req, "index.html")
}

pub fn root_file(req: &mut Request) -> PencilResult {
    let file_name = try_or!(req.view_args.get("filename").cloned(), else return abort(404));
    serve(req, &file_name)
}

pub fn js_file(req: &mut Request) -> PencilResult {
    let file_name = try_or!(req.view_args.get("filename").cloned(), else return abort(404));
    serve(req, &format!("js/{}", file_name))
}

pub fn css_file(req: &mut Request) -> PencilResult {
    let file_name = try_or!(req.view_args.get("filename").cloned(), else return abort(404));
    serve(req, &format!("css/{}", file_name))
}


#[test]
fn test_resolve() {
    use std::fs;
    use tempdir::TempDir;

    let public = TempDir::new("public").unwrap();
    fs::create_dir(public.path().join("js")).unwrap();
    fs::write(public.path().join("index.html"), "<html></html>").unwrap();
    fs::write(public.path().join("js").join("utils.js"), "// utils").unwrap();

    assert_eq!(resolve(public.path(), "index.html"), Some(public.path().join("index.html")));
    assert_eq!(resolve(public.path(), "js/utils.js"),
               Some(public.path().join("js").join("utils.js")));
    assert_eq!(resolve(public.path(), "missing.html"), None);
    assert_eq!(resolve(public.path(), "js"), None);
    assert_eq!(resolve(public.path(), ""), None);
}

#[test]
fn test_resolve_refuses_traversal() {
    use std::fs;
    use tempdir::TempDir;

    let root = TempDir::new("root").unwrap();
    let public = root.path().join("public");
    fs::create_dir(&public).unwrap();
    fs::write(root.path().join("secret.env"), "TARJETA_RUNTIME_PEPPER=...").unwrap();

    assert_eq!(resolve(&public, "../secret.env"), None);
    assert_eq!(resolve(&public, "js/../../secret.env"), None);
    assert_eq!(resolve(&public, root.path().join("secret.env").to_str().unwrap()), None);
    assert_eq!(resolve(&public, "./secret.env"), None);
}
