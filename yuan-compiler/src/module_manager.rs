//! Import resolution, cycle detection and the on-disk `.ymi` cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, trace};
use thiserror::Error;

use crate::ast_context::{ASTContext, Ty};
use crate::type_codec;

#[derive(Debug, Error)]
pub enum ModuleLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("circular import detected: {0}")]
    CircularImport(String),
    #[error("module not found: {0}")]
    NotFound(String),
    #[error("interface parse error in {path}: {reason}")]
    InterfaceCorrupt { path: String, reason: String },
}

/// One export record from a module's public surface.
#[derive(Debug, Clone)]
pub enum ModuleExport {
    Func {
        name: String,
        link_name: String,
        encoded_fn_type: String,
        /// Set when this function is exported because it is an impl method
        /// on an exported nominal type (`original_source` detail folded in
        /// by SPEC_FULL.md).
        owner_type: Option<String>,
        generic_params: Vec<String>,
    },
    Var {
        name: String,
        link_name: String,
        encoded_type: String,
    },
    Const {
        name: String,
        link_name: String,
        encoded_type: String,
    },
    Struct {
        name: String,
        encoded_type: String,
        generic_params: Vec<String>,
        fields: Vec<(String, String)>,
    },
    Enum {
        name: String,
        encoded_type: String,
        generic_params: Vec<String>,
    },
    Trait {
        name: String,
        encoded_type: String,
        generic_params: Vec<String>,
    },
    Alias {
        name: String,
        encoded_type: String,
        generic_params: Vec<String>,
    },
    Module {
        name: String,
        target_path: String,
    },
}

impl ModuleExport {
    pub fn name(&self) -> &str {
        match self {
            ModuleExport::Func { name, .. }
            | ModuleExport::Var { name, .. }
            | ModuleExport::Const { name, .. }
            | ModuleExport::Struct { name, .. }
            | ModuleExport::Enum { name, .. }
            | ModuleExport::Trait { name, .. }
            | ModuleExport::Alias { name, .. }
            | ModuleExport::Module { name, .. } => name,
        }
    }

    /// Any export carrying generic params (or whose type itself mentions an
    /// unresolved generic) needs the source re-analyzed for instantiation —
    /// the interface alone can't specialize a generic.
    pub fn has_generics(&self) -> bool {
        match self {
            ModuleExport::Func { generic_params, .. }
            | ModuleExport::Struct { generic_params, .. }
            | ModuleExport::Enum { generic_params, .. }
            | ModuleExport::Trait { generic_params, .. }
            | ModuleExport::Alias { generic_params, .. } => !generic_params.is_empty(),
            ModuleExport::Var { .. } | ModuleExport::Const { .. } | ModuleExport::Module { .. } => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleInfo {
    pub canonical_name: String,
    pub source_path: PathBuf,
    pub interface_path: PathBuf,
    pub object_path: PathBuf,
    pub exports: Vec<ModuleExport>,
    pub deps: Vec<String>,
    /// Kept for diagnostics ("note: loaded from cached interface") though
    /// spec.md's prose doesn't name it — folded in from `original_source`.
    pub is_from_interface: bool,
    pub is_stdlib: bool,
    pub is_loaded: bool,
}

pub struct ModuleManagerConfig {
    pub stdlib_root: PathBuf,
    pub module_cache_dir: PathBuf,
    pub package_paths: Vec<PathBuf>,
}

impl Default for ModuleManagerConfig {
    fn default() -> Self {
        Self {
            stdlib_root: PathBuf::from("yuan-libs/std"),
            module_cache_dir: PathBuf::from(".yuan/cache"),
            package_paths: Vec::new(),
        }
    }
}

pub struct ModuleManager {
    config: ModuleManagerConfig,
    loaded: HashMap<String, ModuleInfo>,
    /// Grows on entry, shrinks on exit; single-threaded per compiler instance
    /// so a plain `RefCell<Vec<_>>` plays the role of spec's thread-local.
    import_chain: RefCell<Vec<String>>,
}

impl ModuleManager {
    pub fn new(config: ModuleManagerConfig) -> Self {
        Self {
            config,
            loaded: HashMap::new(),
            import_chain: RefCell::new(Vec::new()),
        }
    }

    pub fn loaded_modules(&self) -> &HashMap<String, ModuleInfo> {
        &self.loaded
    }

    /// Path resolution rules: absolute, relative-to-importer,
    /// stdlib-prefixed, then importer-relative/stdlib/package-path fallback,
    /// in that order.
    pub fn resolve_path(&self, import_path: &str, importing_file: Option<&Path>) -> PathBuf {
        let with_ext = |p: PathBuf| -> PathBuf {
            if p.extension().is_none() {
                p.with_extension("yu")
            } else {
                p
            }
        };

        if let Some(abs) = import_path.strip_prefix('/') {
            return with_ext(PathBuf::from("/").join(abs));
        }

        if import_path.starts_with('.') {
            if let Some(file) = importing_file {
                if let Some(dir) = file.parent() {
                    return with_ext(dir.join(import_path));
                }
            }
            return with_ext(PathBuf::from(import_path));
        }

        if let Some(rest) = import_path
            .strip_prefix("std.")
            .or_else(|| import_path.strip_prefix("std/"))
        {
            let rel = rest.replace('.', "/");
            return with_ext(self.config.stdlib_root.join(rel));
        }
        if import_path == "std" {
            return with_ext(self.config.stdlib_root.join("mod"));
        }

        if let Some(file) = importing_file {
            if let Some(dir) = file.parent() {
                let candidate = with_ext(dir.join(import_path));
                if candidate.exists() {
                    return candidate;
                }
            }
        }
        let stdlib_candidate = with_ext(self.config.stdlib_root.join(import_path.replace('.', "/")));
        if stdlib_candidate.exists() {
            return stdlib_candidate;
        }
        for pkg in &self.config.package_paths {
            let candidate = with_ext(pkg.join(import_path.replace('.', "/")));
            if candidate.exists() {
                return candidate;
            }
        }
        stdlib_candidate
    }

    fn canonicalize_key(path: &Path) -> String {
        fs::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .to_string_lossy()
            .into_owned()
    }

    /// 64-bit FNV-1a of the canonical source path, used as the cache key.
    pub fn fnv1a64(s: &str) -> u64 {
        const OFFSET: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;
        let mut hash = OFFSET;
        for byte in s.as_bytes() {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(PRIME);
        }
        hash
    }

    fn cache_paths(&self, source_path: &Path) -> (PathBuf, PathBuf) {
        let key = Self::canonicalize_key(source_path);
        let hash = format!("{:016x}", Self::fnv1a64(&key));
        (
            self.config.module_cache_dir.join(format!("{hash}.ymi")),
            self.config.module_cache_dir.join(format!("{hash}.o")),
        )
    }

    /// Entering the import chain: returns `Err` if `canonical_name` is
    /// already being imported somewhere up the stack.
    fn enter_chain(&self, canonical_name: &str) -> Result<(), ModuleLoadError> {
        let mut chain = self.import_chain.borrow_mut();
        if chain.iter().any(|n| n == canonical_name) {
            let mut cycle = chain.clone();
            cycle.push(canonical_name.to_string());
            return Err(ModuleLoadError::CircularImport(cycle.join(" -> ")));
        }
        chain.push(canonical_name.to_string());
        Ok(())
    }

    fn exit_chain(&self) {
        self.import_chain.borrow_mut().pop();
    }

    /// Loads (or returns the cached) module. Returns `Ok(None)` on a cycle —
    /// the caller reports `err_circular_import`; no partial `ModuleInfo` is
    /// left registered with `is_loaded = true`.
    pub fn load<'ctx>(
        &mut self,
        ctx: &'ctx ASTContext<'ctx>,
        import_path: &str,
        importing_file: Option<&Path>,
        mut analyze_source: impl FnMut(&str, &Path) -> Result<Vec<ModuleExport>, ModuleLoadError>,
    ) -> Result<Option<ModuleInfo>, ModuleLoadError> {
        let source_path = self.resolve_path(import_path, importing_file);
        let canonical = Self::canonicalize_key(&source_path);

        if let Some(existing) = self.loaded.get(&canonical) {
            return Ok(Some(existing.clone()));
        }

        if self.enter_chain(&canonical).is_err() {
            return Ok(None);
        }
        let result = self.load_inner(ctx, &canonical, &source_path, &mut analyze_source);
        self.exit_chain();
        result
    }

    fn load_inner<'ctx>(
        &mut self,
        _ctx: &'ctx ASTContext<'ctx>,
        canonical: &str,
        source_path: &Path,
        analyze_source: &mut impl FnMut(&str, &Path) -> Result<Vec<ModuleExport>, ModuleLoadError>,
    ) -> Result<Option<ModuleInfo>, ModuleLoadError> {
        let (interface_path, object_path) = self.cache_paths(source_path);

        if let Some(info) = self.try_load_from_interface(canonical, source_path, &interface_path, &object_path)? {
            if !info.exports.iter().any(ModuleExport::has_generics) {
                debug!("module cache hit: {canonical}");
                self.loaded.insert(canonical.to_string(), info.clone());
                return Ok(Some(info));
            }
            trace!("interface stub insufficient for generics, re-analyzing source: {canonical}");
        }

        let source = fs::read_to_string(source_path).map_err(|e| ModuleLoadError::Io {
            path: source_path.display().to_string(),
            source: e,
        })?;
        let exports = analyze_source(&source, source_path)?;

        let info = ModuleInfo {
            canonical_name: canonical.to_string(),
            source_path: source_path.to_path_buf(),
            interface_path: interface_path.clone(),
            object_path,
            exports,
            deps: Vec::new(),
            is_from_interface: false,
            is_stdlib: source_path.starts_with(&self.config.stdlib_root),
            is_loaded: true,
        };

        write_interface_atomic(&interface_path, &info)
            .map_err(|e| ModuleLoadError::Io { path: interface_path.display().to_string(), source: e })?;

        self.loaded.insert(canonical.to_string(), info.clone());
        Ok(Some(info))
    }

    fn try_load_from_interface(
        &self,
        canonical: &str,
        source_path: &Path,
        interface_path: &Path,
        object_path: &Path,
    ) -> Result<Option<ModuleInfo>, ModuleLoadError> {
        if !interface_path.exists() {
            return Ok(None);
        }
        let iface_mtime = fs::metadata(interface_path).and_then(|m| m.modified()).ok();
        let source_mtime = fs::metadata(source_path).and_then(|m| m.modified()).ok();
        if let (Some(iface), Some(src)) = (iface_mtime, source_mtime) {
            if iface < src {
                return Ok(None); // stale, fall back to source
            }
        } else if source_mtime.is_none() && iface_mtime.is_none() {
            return Ok(None);
        }

        let text = fs::read_to_string(interface_path).map_err(|e| ModuleLoadError::Io {
            path: interface_path.display().to_string(),
            source: e,
        })?;
        match parse_interface(&text, canonical, source_path, object_path) {
            Ok(mut info) => {
                info.is_from_interface = true;
                Ok(Some(info))
            }
            Err(_) => Ok(None), // partial/corrupt file: fall back to source parsing
        }
    }

    pub fn set_pointer_bit_width_from_target(&self, ctx: &ASTContext<'_>, bits: u32) {
        ctx.set_pointer_bit_width(bits);
    }
}

fn now_line() -> String {
    // `.ymi` files carry no timestamp of their own; the cache key is the
    // canonical path, freshness comes from filesystem mtimes.
    SystemTime::UNIX_EPOCH.elapsed().map(|d| d.as_secs().to_string()).unwrap_or_default()
}

/// Write-to-temp-then-rename so concurrent compiler instances sharing a
/// cache directory never observe a half-written `.ymi`.
fn write_interface_atomic(path: &Path, info: &ModuleInfo) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let _ = now_line();
    let body = render_interface(info);
    let tmp_path = path.with_extension("ymi.tmp");
    fs::write(&tmp_path, body)?;
    fs::rename(&tmp_path, path)
}

fn render_interface(info: &ModuleInfo) -> String {
    let mut out = String::from("YMI2\n");
    out.push_str(&format!("module\t{}\n", info.canonical_name));
    out.push_str(&format!("source\t{}\n", info.source_path.display()));
    out.push_str(&format!("object\t{}\n", info.object_path.display()));
    for dep in &info.deps {
        out.push_str(&format!("dep\t{}\n", dep));
    }
    for export in &info.exports {
        out.push_str(&render_export(export));
    }
    out
}

fn render_export(export: &ModuleExport) -> String {
    match export {
        ModuleExport::Func {
            name,
            link_name,
            encoded_fn_type,
            owner_type,
            generic_params,
        } => {
            let owner = owner_type.as_deref().unwrap_or("-");
            let mut line = format!(
                "export\tfunc\t{name}\t{link_name}\t{encoded_fn_type}\t{owner}\t{}",
                generic_params.len()
            );
            for g in generic_params {
                line.push('\t');
                line.push_str(g);
            }
            line.push('\n');
            line
        }
        ModuleExport::Var { name, link_name, encoded_type } => {
            format!("export\tvar\t{name}\t{link_name}\t{encoded_type}\n")
        }
        ModuleExport::Const { name, link_name, encoded_type } => {
            format!("export\tconst\t{name}\t{link_name}\t{encoded_type}\n")
        }
        ModuleExport::Struct {
            name,
            encoded_type,
            generic_params,
            fields,
        } => {
            let mut line = format!("export\tstruct\t{name}\t{encoded_type}\t{}", generic_params.len());
            for g in generic_params {
                line.push('\t');
                line.push_str(g);
            }
            line.push_str(&format!("\tF\t{}", fields.len()));
            for (fname, fty) in fields {
                line.push('\t');
                line.push_str(fname);
                line.push('\t');
                line.push_str(fty);
            }
            line.push('\n');
            line
        }
        ModuleExport::Enum { name, encoded_type, generic_params } => {
            let mut line = format!("export\tenum\t{name}\t{encoded_type}\t{}", generic_params.len());
            for g in generic_params {
                line.push('\t');
                line.push_str(g);
            }
            line.push('\n');
            line
        }
        ModuleExport::Trait { name, encoded_type, generic_params } => {
            let mut line = format!("export\ttrait\t{name}\t{encoded_type}\t{}", generic_params.len());
            for g in generic_params {
                line.push('\t');
                line.push_str(g);
            }
            line.push('\n');
            line
        }
        ModuleExport::Alias { name, encoded_type, generic_params } => {
            let mut line = format!("export\talias\t{name}\t{encoded_type}\t{}", generic_params.len());
            for g in generic_params {
                line.push('\t');
                line.push_str(g);
            }
            line.push('\n');
            line
        }
        ModuleExport::Module { name, target_path } => {
            format!("export\tmodule\t{name}\t{target_path}\n")
        }
    }
}

fn parse_interface(
    text: &str,
    canonical: &str,
    source_path: &Path,
    object_path: &Path,
) -> Result<ModuleInfo, ModuleLoadError> {
    let corrupt = |reason: &str| ModuleLoadError::InterfaceCorrupt {
        path: source_path.display().to_string(),
        reason: reason.to_string(),
    };

    let mut lines = text.lines();
    let magic = lines.next().ok_or_else(|| corrupt("empty file"))?;
    if magic != "YMI2" {
        return Err(corrupt("bad magic"));
    }

    let mut module_name = canonical.to_string();
    let mut deps = Vec::new();
    let mut exports = Vec::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        match cols.as_slice() {
            ["module", name] => module_name = name.to_string(),
            ["source", ..] | ["object", ..] => {}
            ["dep", path] => deps.push(path.to_string()),
            ["export", "func", name, link_name, enc, owner, n, rest @ ..] => {
                let n: usize = n.parse().map_err(|_| corrupt("bad generic count"))?;
                if rest.len() != n {
                    return Err(corrupt("generic param count mismatch"));
                }
                exports.push(ModuleExport::Func {
                    name: name.to_string(),
                    link_name: link_name.to_string(),
                    encoded_fn_type: enc.to_string(),
                    owner_type: if *owner == "-" { None } else { Some(owner.to_string()) },
                    generic_params: rest.iter().map(|s| s.to_string()).collect(),
                });
            }
            ["export", "var", name, link_name, enc] => exports.push(ModuleExport::Var {
                name: name.to_string(),
                link_name: link_name.to_string(),
                encoded_type: enc.to_string(),
            }),
            ["export", "const", name, link_name, enc] => exports.push(ModuleExport::Const {
                name: name.to_string(),
                link_name: link_name.to_string(),
                encoded_type: enc.to_string(),
            }),
            ["export", "struct", name, enc, n, rest @ ..] => {
                let n: usize = n.parse().map_err(|_| corrupt("bad generic count"))?;
                if rest.len() < n + 2 || rest[n] != "F" {
                    return Err(corrupt("malformed struct export"));
                }
                let generic_params = rest[..n].iter().map(|s| s.to_string()).collect();
                let k: usize = rest[n + 1].parse().map_err(|_| corrupt("bad field count"))?;
                let field_cols = &rest[n + 2..];
                if field_cols.len() != k * 2 {
                    return Err(corrupt("field count mismatch"));
                }
                let fields = field_cols
                    .chunks(2)
                    .map(|c| (c[0].to_string(), c[1].to_string()))
                    .collect();
                exports.push(ModuleExport::Struct {
                    name: name.to_string(),
                    encoded_type: enc.to_string(),
                    generic_params,
                    fields,
                });
            }
            ["export", "enum", name, enc, n, rest @ ..] => {
                let n: usize = n.parse().map_err(|_| corrupt("bad generic count"))?;
                if rest.len() != n {
                    return Err(corrupt("generic param count mismatch"));
                }
                exports.push(ModuleExport::Enum {
                    name: name.to_string(),
                    encoded_type: enc.to_string(),
                    generic_params: rest.iter().map(|s| s.to_string()).collect(),
                });
            }
            ["export", "trait", name, enc, n, rest @ ..] => {
                let n: usize = n.parse().map_err(|_| corrupt("bad generic count"))?;
                if rest.len() != n {
                    return Err(corrupt("generic param count mismatch"));
                }
                exports.push(ModuleExport::Trait {
                    name: name.to_string(),
                    encoded_type: enc.to_string(),
                    generic_params: rest.iter().map(|s| s.to_string()).collect(),
                });
            }
            ["export", "alias", name, enc, n, rest @ ..] => {
                let n: usize = n.parse().map_err(|_| corrupt("bad generic count"))?;
                if rest.len() != n {
                    return Err(corrupt("generic param count mismatch"));
                }
                exports.push(ModuleExport::Alias {
                    name: name.to_string(),
                    encoded_type: enc.to_string(),
                    generic_params: rest.iter().map(|s| s.to_string()).collect(),
                });
            }
            ["export", "module", name, target] => exports.push(ModuleExport::Module {
                name: name.to_string(),
                target_path: target.to_string(),
            }),
            _ => return Err(corrupt("unrecognized directive")),
        }
    }

    Ok(ModuleInfo {
        canonical_name: module_name,
        source_path: source_path.to_path_buf(),
        interface_path: PathBuf::new(),
        object_path: object_path.to_path_buf(),
        exports,
        deps,
        is_from_interface: true,
        is_stdlib: false,
        is_loaded: true,
    })
}

/// Builds the `ModuleType` a `const X = @import(...)` alias resolves to:
/// one member per export, using the already
/// interned canonical type decoded from the `.ymi` encoding.
pub fn module_type_from_exports<'ctx>(
    ctx: &'ctx ASTContext<'ctx>,
    module_path: &str,
    exports: &[ModuleExport],
) -> Ty<'ctx> {
    let module_ty = ctx.module_type(module_path);
    let crate::ast_context::TypeKind::Module(data) = &module_ty.kind else {
        unreachable!()
    };
    let mut members = data.members.borrow_mut();
    if !members.is_empty() {
        return module_ty; // already populated by an earlier import of the same module
    }
    for export in exports {
        let encoded = match export {
            ModuleExport::Func { encoded_fn_type, .. } => encoded_fn_type,
            ModuleExport::Var { encoded_type, .. }
            | ModuleExport::Const { encoded_type, .. }
            | ModuleExport::Struct { encoded_type, .. }
            | ModuleExport::Enum { encoded_type, .. }
            | ModuleExport::Trait { encoded_type, .. }
            | ModuleExport::Alias { encoded_type, .. } => encoded_type,
            ModuleExport::Module { .. } => continue,
        };
        if let Some(ty) = type_codec::decode(encoded, ctx) {
            members.push((export.name().to_string(), ty));
        }
    }
    drop(members);
    module_ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fnv1a64_is_deterministic() {
        assert_eq!(ModuleManager::fnv1a64("hello"), ModuleManager::fnv1a64("hello"));
        assert_ne!(ModuleManager::fnv1a64("hello"), ModuleManager::fnv1a64("world"));
    }

    #[test]
    fn interface_round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let ctx = ASTContext::new();
        let i32_ty = ctx.integer_type(32, true);
        let fn_ty = ctx.function_type(vec![i32_ty, i32_ty], i32_ty, false, false);

        let info = ModuleInfo {
            canonical_name: "a".to_string(),
            source_path: dir.path().join("a.yu"),
            interface_path: dir.path().join("a.ymi"),
            object_path: dir.path().join("a.o"),
            exports: vec![ModuleExport::Func {
                name: "twice".to_string(),
                link_name: "_Y1FMI1_61NI5_7477696365P2_Ti32_Ti32_ER_Ti32Er0Vr0Ar0G0_E_Dnone".to_string(),
                encoded_fn_type: type_codec::encode_type(fn_ty),
                owner_type: None,
                generic_params: vec![],
            }],
            deps: vec![],
            is_from_interface: false,
            is_stdlib: false,
            is_loaded: true,
        };
        write_interface_atomic(&info.interface_path, &info).unwrap();
        let text = fs::read_to_string(&info.interface_path).unwrap();
        let parsed = parse_interface(&text, "a", &info.source_path, &info.object_path).unwrap();
        assert_eq!(parsed.exports.len(), 1);
        assert_eq!(parsed.exports[0].name(), "twice");
    }

    #[test]
    fn partial_interface_falls_back_to_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.ymi");
        fs::write(&path, "YMI2\nexport\tfunc\tonly_three_cols\n").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(parse_interface(&text, "broken", &path, &path).is_err());
    }

    #[test]
    fn path_resolution_rules() {
        let mgr = ModuleManager::new(ModuleManagerConfig {
            stdlib_root: PathBuf::from("/stdlib"),
            module_cache_dir: PathBuf::from("/cache"),
            package_paths: vec![],
        });
        assert_eq!(mgr.resolve_path("/abs/foo", None), PathBuf::from("/abs/foo.yu"));
        assert_eq!(
            mgr.resolve_path("std.io.file", None),
            PathBuf::from("/stdlib/io/file.yu")
        );
        let importer = PathBuf::from("/proj/src/main.yu");
        assert_eq!(
            mgr.resolve_path("./sibling", Some(&importer)),
            PathBuf::from("/proj/src/sibling.yu")
        );
    }
}
