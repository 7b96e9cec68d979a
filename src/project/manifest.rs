use serde::{Deserialize, Serialize};

use crate::compiler::ast::{Item, Program, Statement, Type};

/// The interface of a compiled program: its global variables and its
/// functions, in the order in which they were first declared.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Manifest {
    globals: Vec<GlobalEntry>,
    functions: Vec<FunctionEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GlobalEntry {
    pub name: String,
    pub ty: Type,
}

/// A `ret` of `None` is `void`.  `defined` is false for a function which
/// only has a prototype.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionEntry {
    pub name: String,
    pub ret: Option<Type>,
    pub params: Vec<Type>,
    pub defined: bool,
}

impl Manifest {
    pub fn new(globals: &[GlobalEntry], functions: &[FunctionEntry]) -> Manifest {
        Manifest {
            globals: globals.into(),
            functions: functions.into(),
        }
    }

    /// Builds the manifest of a program which has been translated
    /// successfully.
    pub fn extract(program: &Program) -> Manifest {
        let mut globals = vec![];
        let mut functions: Vec<FunctionEntry> = vec![];

        for item in program.items.iter() {
            match item {
                Item::Prototype(decl) | Item::Function(decl, _) => {
                    let defined = matches!(item, Item::Function(..));
                    match functions.iter_mut().find(|f| f.name == decl.name) {
                        Some(entry) => entry.defined |= defined,
                        None => functions.push(FunctionEntry {
                            name: decl.name.clone(),
                            ret: decl.ret_ty.clone(),
                            params: decl.param_types(),
                            defined,
                        }),
                    }
                }
                Item::Statement(Statement::Declaration(decl)) => {
                    for declarator in decl.declarators.iter() {
                        globals.push(GlobalEntry {
                            name: declarator.name.clone(),
                            ty: declarator.ty(&decl.ty),
                        })
                    }
                }
                Item::Statement(_) => (),
            }
        }

        Manifest { globals, functions }
    }

    pub fn get_globals(&self) -> &Vec<GlobalEntry> {
        &self.globals
    }

    pub fn get_functions(&self) -> &Vec<FunctionEntry> {
        &self.functions
    }

    /// Loads a manifest from the given reader.
    pub fn read<R: std::io::Read>(reader: R) -> Result<Manifest, serde_yaml::Error> {
        let manifest: Manifest = serde_yaml::from_reader(reader)?;
        Ok(manifest)
    }

    /// Writes the Manifest to the given writer
    pub fn write<W: std::io::Write>(&self, writer: W) -> Result<(), serde_yaml::Error> {
        serde_yaml::to_writer(writer, self)
    }
}
