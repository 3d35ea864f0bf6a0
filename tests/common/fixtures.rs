use serde_json::{Value, json};

/// A small list of user records with nested profiles and address lists.
pub fn users() -> Value {
    json!([
        {
            "name": "Ali",
            "family": "Javadi",
            "profile": {
                "age": 45,
                "city": "Tehran",
                "address": [
                    { "state": "Tehran", "zip": "1000" },
                    { "state": "Alborz", "zip": "3100" }
                ]
            },
            "tags": ["admin", "dev"]
        },
        {
            "name": "Sara",
            "family": "Karimi",
            "profile": {
                "age": 21,
                "city": "Pardis",
                "address": [{ "state": "Tehran", "zip": "1650" }]
            },
            "tags": ["dev"]
        },
        {
            "name": "Reza",
            "family": "Sheikh Hosseini",
            "profile": {
                "age": 33,
                "city": null,
                "address": []
            },
            "tags": []
        }
    ])
}

/// A single object document, for operations that do not need an array root.
pub fn order() -> Value {
    json!({
        "id": 17,
        "customer": { "name": "Ali" },
        "items": [
            { "sku": "A-1", "price": 2.5, "qty": 4 },
            { "sku": "B-2", "price": 10, "qty": 1 }
        ]
    })
}
