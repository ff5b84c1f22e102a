use doclens::Schema;
use doclens::engine::memory::InMemory;

/// The todo-list document shape used across the suite.
pub fn todoapp_schema() -> Schema {
    Schema::record([
        ("title", Schema::str_reg()),
        (
            "tasks",
            Schema::sequence(Schema::record([
                ("title", Schema::str_reg()),
                ("complete", Schema::flag()),
            ])),
        ),
    ])
}

pub fn todoapp_doc() -> InMemory {
    InMemory::with_schema(todoapp_schema())
}

/// A record exercising every leaf kind plus a map, a sequence, and a null
/// position.
pub fn kitchen_sink_schema() -> Schema {
    Schema::record([
        ("done", Schema::flag()),
        ("active", Schema::bool_reg()),
        ("count", Schema::u64_reg()),
        ("offset", Schema::i64_reg()),
        ("name", Schema::str_reg()),
        ("scores", Schema::map(Schema::u64_reg())),
        ("notes", Schema::sequence(Schema::str_reg())),
        ("nothing", Schema::Null),
    ])
}

pub fn kitchen_sink_doc() -> InMemory {
    InMemory::with_schema(kitchen_sink_schema())
}
