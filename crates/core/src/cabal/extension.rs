//! Language extension identifiers as they appear in `default-extensions`.

use std::fmt;

/// Extensions GHC knows by name. A `No` prefix on any of these disables it.
const KNOWN_EXTENSIONS: &[&str] = &[
    "AllowAmbiguousTypes",
    "AlternativeLayoutRule",
    "AlternativeLayoutRuleTransitional",
    "ApplicativeDo",
    "Arrows",
    "AutoDeriveTypeable",
    "BangPatterns",
    "BinaryLiterals",
    "BlockArguments",
    "CApiFFI",
    "CPP",
    "CUSKs",
    "ConstrainedClassMethods",
    "ConstraintKinds",
    "DataKinds",
    "DatatypeContexts",
    "DeepSubsumption",
    "DefaultSignatures",
    "DeriveAnyClass",
    "DeriveDataTypeable",
    "DeriveFoldable",
    "DeriveFunctor",
    "DeriveGeneric",
    "DeriveLift",
    "DeriveTraversable",
    "DerivingStrategies",
    "DerivingVia",
    "DisambiguateRecordFields",
    "DoAndIfThenElse",
    "DoRec",
    "DuplicateRecordFields",
    "EmptyCase",
    "EmptyDataDecls",
    "EmptyDataDeriving",
    "ExistentialQuantification",
    "ExplicitForAll",
    "ExplicitNamespaces",
    "ExtendedDefaultRules",
    "ExtendedLiterals",
    "FieldSelectors",
    "FlexibleContexts",
    "FlexibleInstances",
    "ForeignFunctionInterface",
    "FunctionalDependencies",
    "GADTSyntax",
    "GADTs",
    "GHCForeignImportPrim",
    "GeneralisedNewtypeDeriving",
    "GeneralizedNewtypeDeriving",
    "HexFloatLiterals",
    "ImplicitParams",
    "ImplicitPrelude",
    "ImportQualifiedPost",
    "ImpredicativeTypes",
    "IncoherentInstances",
    "InstanceSigs",
    "InterruptibleFFI",
    "KindSignatures",
    "LambdaCase",
    "LexicalNegation",
    "LiberalTypeSynonyms",
    "LinearTypes",
    "MagicHash",
    "MonadComprehensions",
    "MonoLocalBinds",
    "MonoPatBinds",
    "MonomorphismRestriction",
    "MultiParamTypeClasses",
    "MultiWayIf",
    "NPlusKPatterns",
    "NamedFieldPuns",
    "NamedWildCards",
    "NegativeLiterals",
    "NondecreasingIndentation",
    "NullaryTypeClasses",
    "NumDecimals",
    "NumericUnderscores",
    "OverlappingInstances",
    "OverloadedLabels",
    "OverloadedLists",
    "OverloadedRecordDot",
    "OverloadedRecordUpdate",
    "OverloadedStrings",
    "PackageImports",
    "ParallelArrays",
    "ParallelListComp",
    "PartialTypeSignatures",
    "PatternGuards",
    "PatternSignatures",
    "PatternSynonyms",
    "PolyKinds",
    "PolymorphicComponents",
    "PostfixOperators",
    "QualifiedDo",
    "QuantifiedConstraints",
    "QuasiQuotes",
    "Rank2Types",
    "RankNTypes",
    "RebindableSyntax",
    "RecordPuns",
    "RecordWildCards",
    "RecursiveDo",
    "RelaxedPolyRec",
    "RequiredTypeArguments",
    "RestrictedTypeSynonyms",
    "RoleAnnotations",
    "Safe",
    "ScopedTypeVariables",
    "StandaloneDeriving",
    "StandaloneKindSignatures",
    "StarIsType",
    "StaticPointers",
    "Strict",
    "StrictData",
    "TemplateHaskell",
    "TemplateHaskellQuotes",
    "TraditionalRecordSyntax",
    "TransformListComp",
    "Trustworthy",
    "TupleSections",
    "TypeAbstractions",
    "TypeApplications",
    "TypeData",
    "TypeFamilies",
    "TypeFamilyDependencies",
    "TypeInType",
    "TypeOperators",
    "TypeSynonymInstances",
    "UnboxedSums",
    "UnboxedTuples",
    "UndecidableInstances",
    "UndecidableSuperClasses",
    "UnicodeSyntax",
    "UnliftedDatatypes",
    "UnliftedFFITypes",
    "UnliftedNewtypes",
    "Unsafe",
    "ViewPatterns",
];

fn is_known(name: &str) -> bool {
    KNOWN_EXTENSIONS.binary_search(&name).is_ok()
}

/// One entry of an extensions field.
///
/// Ordering is derived, so a `BTreeSet` of these puts enabled extensions
/// first, then disabled ones, then unknown ones, each group by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageExtension {
    Enable(String),
    Disable(String),
    Unknown(String),
}

impl LanguageExtension {
    /// Classify a declared token the way Cabal does: `NoFoo` disables a known
    /// `Foo`, a known name enables itself, anything else is kept verbatim.
    pub fn classify(token: &str) -> Self {
        if let Some(rest) = token.strip_prefix("No") {
            if is_known(rest) {
                return LanguageExtension::Disable(rest.to_string());
            }
        }
        if is_known(token) {
            LanguageExtension::Enable(token.to_string())
        } else {
            LanguageExtension::Unknown(token.to_string())
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, LanguageExtension::Unknown(_))
    }
}

impl fmt::Display for LanguageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageExtension::Enable(name) | LanguageExtension::Unknown(name) => {
                write!(f, "{name}")
            }
            LanguageExtension::Disable(name) => write!(f, "No{name}"),
        }
    }
}
