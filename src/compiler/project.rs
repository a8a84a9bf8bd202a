use std::collections::HashMap;

use log::{debug, info};

use super::{
    ast::Module,
    lexer::{tokens::Token, LexerError},
    memory::{FileLayout, MemoryTracker, ProgramLayout, UserDefinedType},
    parser::{parse, ParserError},
    semantics::{SemanticError, SymbolResolver, VerifiedFile, Verifier},
    CompilerError, Lexer, Position,
};

/// Provides the source text of a file given its file id.
pub trait SourceLoader {
    fn load(&mut self, file_id: &str) -> Result<String, String>;
}

/// Serves source text from memory.
#[derive(Clone, Debug, Default)]
pub struct StringLoader {
    sources: HashMap<String, String>,
}

impl StringLoader {
    pub fn new() -> StringLoader {
        StringLoader::default()
    }

    pub fn add(&mut self, file_id: &str, text: &str) {
        self.sources.insert(file_id.into(), text.into());
    }

    pub fn with(mut self, file_id: &str, text: &str) -> StringLoader {
        self.add(file_id, text);
        self
    }
}

impl SourceLoader for StringLoader {
    fn load(&mut self, file_id: &str) -> Result<String, String> {
        self.sources
            .get(file_id)
            .cloned()
            .ok_or_else(|| format!("no source for {}", file_id))
    }
}

/// The failure of one file of a project.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectError {
    Load {
        file: String,
        message: String,
    },
    Lexer {
        file: String,
        error: CompilerError<LexerError>,
    },
    Parser {
        file: String,
        error: CompilerError<ParserError>,
    },
    Semantic {
        file: String,
        error: CompilerError<SemanticError>,
    },
    CircularImport {
        file: String,
        position: Position,
        chain: Vec<String>,
    },
    Import {
        file: String,
        position: Position,
        imported: String,
        inner: Box<ProjectError>,
    },
}

impl ProjectError {
    pub fn file(&self) -> &str {
        match self {
            ProjectError::Load { file, .. }
            | ProjectError::Lexer { file, .. }
            | ProjectError::Parser { file, .. }
            | ProjectError::Semantic { file, .. }
            | ProjectError::CircularImport { file, .. }
            | ProjectError::Import { file, .. } => file,
        }
    }

    /// The files from the one that was compiled down to the one that failed.
    pub fn chain(&self) -> Vec<&str> {
        let mut chain = vec![self.file()];
        let mut current = self;
        while let ProjectError::Import { inner, .. } = current {
            chain.push(inner.file());
            current = inner.as_ref();
        }
        chain
    }

    /// The error of the file at the end of the import chain.
    pub fn root_cause(&self) -> &ProjectError {
        match self {
            ProjectError::Import { inner, .. } => inner.root_cause(),
            e => e,
        }
    }
}

impl std::fmt::Display for ProjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectError::Load { file, message } => {
                f.write_fmt(format_args!("{}: could not load: {}", file, message))
            }
            ProjectError::Lexer { file, error } => f.write_fmt(format_args!("{}: {}", file, error)),
            ProjectError::Parser { file, error } => {
                f.write_fmt(format_args!("{}: {}", file, error))
            }
            ProjectError::Semantic { file, error } => {
                f.write_fmt(format_args!("{}: {}", file, error))
            }
            ProjectError::CircularImport {
                file,
                position,
                chain,
            } => f.write_fmt(format_args!(
                "{}: L{}: Circular import: {}",
                file,
                position,
                chain.join(" -> ")
            )),
            ProjectError::Import {
                file,
                position,
                imported,
                inner,
            } => f.write_fmt(format_args!(
                "{}: L{}: Could not import {}\n{}",
                file, position, imported, inner
            )),
        }
    }
}

impl std::error::Error for ProjectError {}

/**
 Compiles a file and every file that it imports, directly or indirectly.

 All files share one [`MemoryTracker`] and one [`SymbolResolver`].  Imports
 are compiled before the file which imports them and every file is verified
 at most once.  While a file is being compiled it is active; importing an
 active file is a circular import.

 The top level user defined types of every file reachable through the
 imports of a file are active in memory while that file is verified.
*/
pub struct Project<L: SourceLoader> {
    loader: L,
    memory: MemoryTracker,
    resolver: SymbolResolver,
    active: Vec<String>,
    verified: Vec<VerifiedFile>,
}

impl<L: SourceLoader> Project<L> {
    pub fn new(loader: L) -> Project<L> {
        Project {
            loader,
            memory: MemoryTracker::new(),
            resolver: SymbolResolver::new(),
            active: vec![],
            verified: vec![],
        }
    }

    pub fn compile(&mut self, file_id: &str) -> Result<(), ProjectError> {
        info!("Compiling {}", file_id);
        self.active.clear();
        self.compile_file(file_id)
    }

    fn compile_file(&mut self, file_id: &str) -> Result<(), ProjectError> {
        if self.verified(file_id).is_some() {
            debug!("{} is already verified", file_id);
            return Ok(());
        }

        let module = self.load(file_id)?;

        self.active.push(file_id.into());
        let result = self.compile_module(file_id, &module);
        self.active.pop();
        result
    }

    fn compile_module(&mut self, file_id: &str, module: &Module) -> Result<(), ProjectError> {
        self.resolver.add_file(file_id);

        for import in module.imports() {
            let position = import.token.position;
            if let Some(idx) = self.active.iter().position(|f| *f == import.file) {
                let mut chain = self.active[idx..].to_vec();
                chain.push(import.file.clone());
                return Err(ProjectError::CircularImport {
                    file: file_id.into(),
                    position,
                    chain,
                });
            }

            self.compile_file(&import.file)
                .map_err(|inner| ProjectError::Import {
                    file: file_id.into(),
                    position,
                    imported: import.file.clone(),
                    inner: Box::new(inner),
                })?;
            self.resolver.add_outer_scope(file_id, &import.file);
        }

        let udts = self.imported_udts(module)?;

        self.memory.open_scope();
        for udt in udts {
            self.memory.add_udt(udt);
        }
        let result = Verifier::new(file_id, &mut self.memory, &mut self.resolver).verify(module);
        self.memory.close_scope();

        let verified = result.map_err(|error| ProjectError::Semantic {
            file: file_id.into(),
            error,
        })?;
        self.verified.push(verified);
        Ok(())
    }

    /// Collects the top level types of every file reachable through the
    /// imports of `module`.  Two different files supplying a type with the
    /// same name is an error.
    fn imported_udts(&self, module: &Module) -> Result<Vec<UserDefinedType>, ProjectError> {
        let mut visited: Vec<String> = vec![];
        let mut udts: Vec<UserDefinedType> = vec![];

        for import in module.imports() {
            let mut pending = vec![import.file.clone()];
            while let Some(file) = pending.pop() {
                if visited.contains(&file) {
                    continue;
                }

                let verified = match self.verified(&file) {
                    Some(verified) => verified,
                    None => continue,
                };

                for udt in &verified.udts {
                    if udts.iter().any(|u| u.id == udt.id) {
                        return Err(ProjectError::Semantic {
                            file: module.file_id().into(),
                            error: CompilerError::new(
                                import.token.position,
                                SemanticError::NameInUse(udt.id.clone()),
                            ),
                        });
                    }
                    udts.push(udt.clone());
                }

                if let Some(table) = self.resolver.table(&file) {
                    pending.extend(table.outer_scopes().iter().cloned());
                }
                visited.push(file);
            }
        }

        Ok(udts)
    }

    pub fn tokenize(&mut self, file_id: &str) -> Result<Vec<Token>, ProjectError> {
        let text = self
            .loader
            .load(file_id)
            .map_err(|message| ProjectError::Load {
                file: file_id.into(),
                message,
            })?;

        Lexer::new(&text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .map_err(|error| ProjectError::Lexer {
                file: file_id.into(),
                error,
            })
    }

    pub fn load(&mut self, file_id: &str) -> Result<Module, ProjectError> {
        let tokens = self.tokenize(file_id)?;
        parse(file_id, &tokens).map_err(|error| ProjectError::Parser {
            file: file_id.into(),
            error,
        })
    }

    pub fn memory(&self) -> &MemoryTracker {
        &self.memory
    }

    pub fn resolver(&self) -> &SymbolResolver {
        &self.resolver
    }

    pub fn verified_files(&self) -> &[VerifiedFile] {
        &self.verified
    }

    pub fn verified(&self, file_id: &str) -> Option<&VerifiedFile> {
        self.verified.iter().find(|v| v.file_id == file_id)
    }

    /// The storage layout of every file verified so far.
    pub fn layout(&self) -> ProgramLayout {
        let files = self
            .verified
            .iter()
            .map(|v| FileLayout {
                file_id: v.file_id.clone(),
                udts: v.udts.clone(),
                frames: v.frames.clone(),
            })
            .collect();
        ProgramLayout::new(&self.memory, files)
    }

    /// Discards everything compiled so far.
    pub fn reset(&mut self) {
        self.memory.clear_memory();
        self.resolver = SymbolResolver::new();
        self.active.clear();
        self.verified.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::semantics::SemanticError;

    #[test]
    fn imports_are_compiled_first() {
        let loader = StringLoader::new()
            .with("main", "import \"util\"; fn main() { var x: u8 = twice(2); }")
            .with("util", "export fn twice(a: u8) -> u8 { return a + a; }");
        let mut project = Project::new(loader);
        project.compile("main").unwrap();

        let files: Vec<&str> = project
            .verified_files()
            .iter()
            .map(|v| v.file_id.as_str())
            .collect();
        assert_eq!(files, vec!["util", "main"]);
    }

    #[test]
    fn shared_import_is_verified_once() {
        let loader = StringLoader::new()
            .with("main", "import \"a\"; import \"b\";")
            .with("a", "import \"common\";")
            .with("b", "import \"common\";")
            .with("common", "export var shared: u16;");
        let mut project = Project::new(loader);
        project.compile("main").unwrap();

        assert_eq!(project.verified_files().len(), 4);
        assert_eq!(project.memory().data_segment().len(), 1);
    }

    #[test]
    fn circular_import() {
        let loader = StringLoader::new()
            .with("a", "import \"b\";")
            .with("b", "import \"a\";");
        let mut project = Project::new(loader);
        let err = project.compile("a").unwrap_err();

        assert_eq!(err.chain(), vec!["a", "b"]);
        match err.root_cause() {
            ProjectError::CircularImport { file, chain, .. } => {
                assert_eq!(file, "b");
                assert_eq!(chain, &vec!["a".to_string(), "b".into(), "a".into()]);
            }
            other => panic!("Expected circular import, found {:?}", other),
        }
        assert!(project.verified_files().is_empty());
    }

    #[test]
    fn self_import() {
        let loader = StringLoader::new().with("a", "import \"a\";");
        let mut project = Project::new(loader);
        let err = project.compile("a").unwrap_err();
        assert!(matches!(err, ProjectError::CircularImport { .. }));
    }

    #[test]
    fn failing_import_names_the_chain() {
        let loader = StringLoader::new()
            .with("main", "import \"lib\";")
            .with("lib", "import \"deep\";")
            .with("deep", "var x: u8 = y;");
        let mut project = Project::new(loader);
        let err = project.compile("main").unwrap_err();

        assert_eq!(err.chain(), vec!["main", "lib", "deep"]);
        assert_eq!(
            err.to_string(),
            "main: L1:1: Could not import lib\nlib: L1:1: Could not import deep\ndeep: L1:13: x must be initialized with a literal value"
        );
    }

    #[test]
    fn missing_file() {
        let mut project = Project::new(StringLoader::new().with("main", "import \"nope\";"));
        let err = project.compile("main").unwrap_err();
        assert!(matches!(err.root_cause(), ProjectError::Load { file, .. } if file == "nope"));
    }

    #[test]
    fn lexer_and_parser_errors_are_reported_per_file() {
        let mut project = Project::new(StringLoader::new().with("main", "var s: string = \"abc;"));
        assert!(matches!(
            project.compile("main"),
            Err(ProjectError::Lexer { .. })
        ));

        let mut project = Project::new(StringLoader::new().with("main", "var x u8;"));
        assert!(matches!(
            project.compile("main"),
            Err(ProjectError::Parser { .. })
        ));
    }

    #[test]
    fn imported_types_are_active() {
        let loader = StringLoader::new()
            .with(
                "main",
                "import \"shapes\";
                fn area(r: Rect) -> u16 {
                    return r.size.w * r.size.h;
                }",
            )
            .with(
                "shapes",
                "import \"size\";
                export type Rect { origin: u8, size: Size }",
            )
            .with("size", "export type Size { w: u8, h: u8 }");
        let mut project = Project::new(loader);
        project.compile("main").unwrap();

        // every file's types are inactive once it is verified
        assert!(project.memory().udts().is_empty());
        assert_eq!(project.memory().scope_depth(), 0);
    }

    #[test]
    fn sibling_imports_with_the_same_type() {
        let loader = StringLoader::new()
            .with("main", "import \"a\";\nimport \"b\";")
            .with("a", "export type Point { x: u8 }")
            .with("b", "export type Point { y: u8 }");
        let mut project = Project::new(loader);
        let err = project.compile("main").unwrap_err();

        match err {
            ProjectError::Semantic { file, error } => {
                assert_eq!(file, "main");
                assert_eq!(error.line(), 2);
                assert_eq!(error.inner(), &SemanticError::NameInUse("Point".into()));
            }
            other => panic!("Expected a semantic error, found {:?}", other),
        }
    }

    #[test]
    fn failed_file_leaves_memory_scopes_balanced() {
        let loader = StringLoader::new().with(
            "main",
            "fn f() { if 1 { var x: u8; var y: u8 = q; } }",
        );
        let mut project = Project::new(loader);
        assert!(project.compile("main").is_err());
        assert_eq!(project.memory().scope_depth(), 0);
        assert_eq!(project.memory().stack_len(), 0);
        assert_eq!(
            project.resolver().table("main").map(|t| t.scope_depth()),
            Some(0)
        );
    }

    #[test]
    fn layout_lists_every_verified_file() {
        let loader = StringLoader::new()
            .with("main", "import \"g\"; var b: u16 = 7; fn f(a: u8) { var c: u32; }")
            .with("g", "export var a: u8 = 1;");
        let mut project = Project::new(loader);
        project.compile("main").unwrap();

        let layout = project.layout();
        assert_eq!(layout.data_segment_size, 3);
        assert_eq!(layout.files.len(), 2);
        assert_eq!(layout.files[1].frames[0].function, "f");
        assert_eq!(layout.files[1].frames[0].size(), 5);

        project.reset();
        assert!(project.verified_files().is_empty());
        assert_eq!(project.memory().data_segment_size(), 0);
    }
}
