//! Fixed-text diagnostic kinds for name resolution and type checking.
//!
//! Keeping these as an enum instead of ad hoc strings means a pass can't
//! typo a message, and a reader of the analysis code sees at a glance
//! which failure it is reporting.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    NonFunctionDeclaredVoid,
    MultiplyDeclaredIdentifier,
    InvalidNameOfStructType,
    UndeclaredIdentifier,
    DotAccessOfNonStruct,
    InvalidStructFieldName,
    ArithmeticNonNumeric,
    LogicalNonBool,
    RelationalNonNumeric,
    EqualityVoidFunctions,
    EqualityFunctions,
    EqualityStructNames,
    EqualityStructVariables,
    TypeMismatch,
    FunctionAssignment,
    StructNameAssignment,
    StructVariableAssignment,
    AttemptCallNonFunction,
    WrongNumberOfArgs,
    ActualFormalTypeMismatch,
    NonBoolIfCondition,
    NonBoolWhileCondition,
    NonIntRepeatClause,
    ReadFunction,
    ReadStructName,
    ReadStructVariable,
    WriteFunction,
    WriteStructName,
    WriteStructVariable,
    WriteVoid,
    ReturnValueInVoidFunction,
    MissingReturnValue,
    BadReturnValue,
    NoMainFunction,
}

impl DiagnosticKind {
    pub fn message(self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            NonFunctionDeclaredVoid => "Non-function declared void",
            MultiplyDeclaredIdentifier => "Multiply declared identifier",
            InvalidNameOfStructType => "Invalid name of struct type",
            UndeclaredIdentifier => "Undeclared identifier",
            DotAccessOfNonStruct => "Dot-access of non-struct type",
            InvalidStructFieldName => "Invalid struct field name",
            ArithmeticNonNumeric => "Arithmetic operator applied to non-numeric operand",
            LogicalNonBool => "Logical operator applied to non-bool operand",
            RelationalNonNumeric => "Relational operator applied to non-numeric operand",
            EqualityVoidFunctions => "Equality operator applied to void functions",
            EqualityFunctions => "Equality operator applied to functions",
            EqualityStructNames => "Equality operator applied to struct names",
            EqualityStructVariables => "Equality operator applied to struct variables",
            TypeMismatch => "Type mismatch",
            FunctionAssignment => "Function assignment",
            StructNameAssignment => "Struct name assignment",
            StructVariableAssignment => "Struct variable assignment",
            AttemptCallNonFunction => "Attempt to call a non-function",
            WrongNumberOfArgs => "Function call with wrong number of args",
            ActualFormalTypeMismatch => "Type of actual does not match type of formal",
            NonBoolIfCondition => "Non-bool expression used as an if condition",
            NonBoolWhileCondition => "Non-bool expression used as a while condition",
            NonIntRepeatClause => "Non-integer expression used as a repeat clause",
            ReadFunction => "Attempt to read a function",
            ReadStructName => "Attempt to read a struct name",
            ReadStructVariable => "Attempt to read a struct variable",
            WriteFunction => "Attempt to write a function",
            WriteStructName => "Attempt to write a struct name",
            WriteStructVariable => "Attempt to write a struct variable",
            WriteVoid => "Attempt to write void",
            ReturnValueInVoidFunction => "Return with a value in a void function",
            MissingReturnValue => "Missing return value",
            BadReturnValue => "Bad return value",
            NoMainFunction => "No main function",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
