#![cfg(test)]

//! The handful of whole-pipeline scenarios that exercise nesting,
//! arithmetic, `@extend`, `@content`, and modules together rather than
//! one evaluator feature in isolation.

#[macro_use]
mod macros;

test!(
    nested_selectors_join_with_a_space,
    ".a {\n  color: red;\n  .b {\n    color: blue;\n  }\n}\n",
    ".a {\n  color: red;\n}\n.a .b {\n  color: blue;\n}\n"
);

test!(
    arithmetic_mixes_unitless_and_unit_operands,
    "$w: 10px;\n.x {\n  width: $w + 5;\n  height: $w / 2;\n}\n",
    ".x {\n  width: 15px;\n  height: 5px;\n}\n"
);

test!(
    extend_merges_selectors_onto_one_rule,
    ".error {\n  color: red;\n}\n.warning {\n  @extend .error;\n  font-weight: bold;\n}\n",
    ".error, .warning {\n  color: red;\n}\n.warning {\n  font-weight: bold;\n}\n"
);

test!(
    mixin_content_block_splices_into_the_call_site,
    "@mixin box {\n  .box {\n    @content;\n  }\n}\n@include box {\n  color: green;\n}\n",
    ".box {\n  color: green;\n}\n"
);

error!(
    adding_incompatible_units_is_an_error,
    "a {\n  width: 5px + 5em;\n}\n",
    "Error: Incompatible units px and em."
);
