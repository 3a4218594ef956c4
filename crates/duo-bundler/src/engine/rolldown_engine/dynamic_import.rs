//! Routes `import()` call sites through a loader function.
//!
//! Only the `import` keyword of each dynamic import expression is replaced,
//! so `import("./lazy-1.mjs")` becomes `__import__("./lazy-1.mjs")` and the
//! rest of the (possibly minified) chunk keeps its exact text.

use oxc_allocator::Allocator;
use oxc_ast::ast::ImportExpression;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;

use crate::{Error, Result};

const IMPORT_KEYWORD: &str = "import";

#[derive(Default)]
struct ImportSiteCollector {
    starts: Vec<u32>,
}

impl<'a> Visit<'a> for ImportSiteCollector {
    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        self.starts.push(expr.span.start);
        walk::walk_import_expression(self, expr);
    }
}

/// Rewrite every dynamic import in `code` to call `loader`.
pub(crate) fn rewrite_dynamic_imports(code: &str, file_name: &str, loader: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ParserReturn {
        program, errors, ..
    } = Parser::new(&allocator, code, SourceType::mjs()).parse();

    if !errors.is_empty() {
        return Err(Error::Transform {
            file: file_name.to_string(),
            message: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        });
    }

    let mut collector = ImportSiteCollector::default();
    collector.visit_program(&program);

    if collector.starts.is_empty() {
        return Ok(code.to_string());
    }

    collector.starts.sort_unstable();
    let mut out = String::with_capacity(code.len() + collector.starts.len() * loader.len());
    let mut cursor = 0usize;
    for start in collector.starts {
        let start = start as usize;
        if code.get(start..start + IMPORT_KEYWORD.len()) != Some(IMPORT_KEYWORD) {
            continue;
        }
        out.push_str(&code[cursor..start]);
        out.push_str(loader);
        cursor = start + IMPORT_KEYWORD.len();
    }
    out.push_str(&code[cursor..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_call_sites() {
        let code = "const m = await import(\"./lazy-1.mjs\");\nexport { m };\n";
        let out = rewrite_dynamic_imports(code, "main.mjs", "__import__").unwrap();
        assert_eq!(
            out,
            "const m = await __import__(\"./lazy-1.mjs\");\nexport { m };\n"
        );
    }

    #[test]
    fn test_static_imports_and_strings_untouched() {
        let code = "import { a } from \"./a-1.mjs\";\nconst s = \"import('x')\";\nimport.meta.url;\n";
        let out = rewrite_dynamic_imports(code, "main.mjs", "__import__").unwrap();
        assert_eq!(out, code);
    }

    #[test]
    fn test_nested_dynamic_imports() {
        let code = "f(()=>import(\"./a.mjs\").then(()=>import(\"./b.mjs\")))";
        let out = rewrite_dynamic_imports(code, "main.mjs", "load").unwrap();
        assert_eq!(out, "f(()=>load(\"./a.mjs\").then(()=>load(\"./b.mjs\")))");
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = rewrite_dynamic_imports("const = ;", "broken.mjs", "__import__").unwrap_err();
        assert!(matches!(err, Error::Transform { ref file, .. } if file == "broken.mjs"));
    }
}
