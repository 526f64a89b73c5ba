//! Well-known dialect and vocabulary IRIs.

pub const DRAFT_4: &str = "http://json-schema.org/draft-04/schema";
pub const DRAFT_6: &str = "http://json-schema.org/draft-06/schema";
pub const DRAFT_7: &str = "http://json-schema.org/draft-07/schema";
pub const DRAFT_2019_09: &str = "https://json-schema.org/draft/2019-09/schema";
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";
pub const OPENAPI_3_0: &str = "https://spec.openapis.org/oas/3.0/dialect";
pub const OPENAPI_3_1: &str = "https://spec.openapis.org/oas/3.1/dialect/base";

pub const VOCAB_2019_09_CORE: &str = "https://json-schema.org/draft/2019-09/vocab/core";
pub const VOCAB_2019_09_APPLICATOR: &str = "https://json-schema.org/draft/2019-09/vocab/applicator";
pub const VOCAB_2019_09_VALIDATION: &str = "https://json-schema.org/draft/2019-09/vocab/validation";
pub const VOCAB_2019_09_META_DATA: &str = "https://json-schema.org/draft/2019-09/vocab/meta-data";
pub const VOCAB_2019_09_FORMAT: &str = "https://json-schema.org/draft/2019-09/vocab/format";
pub const VOCAB_2019_09_CONTENT: &str = "https://json-schema.org/draft/2019-09/vocab/content";

pub const VOCAB_2020_12_CORE: &str = "https://json-schema.org/draft/2020-12/vocab/core";
pub const VOCAB_2020_12_APPLICATOR: &str = "https://json-schema.org/draft/2020-12/vocab/applicator";
pub const VOCAB_2020_12_UNEVALUATED: &str = "https://json-schema.org/draft/2020-12/vocab/unevaluated";
pub const VOCAB_2020_12_VALIDATION: &str = "https://json-schema.org/draft/2020-12/vocab/validation";
pub const VOCAB_2020_12_META_DATA: &str = "https://json-schema.org/draft/2020-12/vocab/meta-data";
pub const VOCAB_2020_12_FORMAT_ANNOTATION: &str =
    "https://json-schema.org/draft/2020-12/vocab/format-annotation";
pub const VOCAB_2020_12_FORMAT_ASSERTION: &str =
    "https://json-schema.org/draft/2020-12/vocab/format-assertion";
pub const VOCAB_2020_12_CONTENT: &str = "https://json-schema.org/draft/2020-12/vocab/content";

pub const VOCAB_OPENAPI_3_1_BASE: &str = "https://spec.openapis.org/oas/3.1/vocab/base";
