//! operation boilerplate templates
//!
//! fixed go source wrapped around every generated operation. `render` is a
//! pure function of the operation name, its printed source text, and whether
//! the operation declares variables; it has no other coupling to the
//! synthesizer.

/// shared go prelude: imports plus the request payload type
pub(crate) const PRELUDE: &str = r#"import (
	"bytes"
	"context"
	"encoding/json"
	"fmt"
	"io"
	"net/http"
)

// operationPayload is the json body posted to the graphql endpoint.
type operationPayload struct {
	Query     string      `json:"query"`
	Variables interface{} `json:"variables,omitempty"`
}
"#;

/// render the request/response boilerplate for one operation.
///
/// the output references `<name>Variables` and `<name>Response` exactly as
/// emitted by the operation synthesizer.
pub fn render(name: &str, operation_text: &str, has_variables: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "// {name}Source is the graphql source text sent for {name}.\n"
    ));
    out.push_str(&format!("const {name}Source = `{operation_text}`\n\n"));

    out.push_str(&format!(
        "// {name} executes the {name} operation against the given graphql endpoint.\n"
    ));
    if has_variables {
        out.push_str(&format!(
            "func {name}(ctx context.Context, client *http.Client, endpoint string, variables {name}Variables) (*{name}Response, error) {{\n"
        ));
        out.push_str(&format!(
            "\tpayload, err := json.Marshal(operationPayload{{Query: {name}Source, Variables: variables}})\n"
        ));
    } else {
        out.push_str(&format!(
            "func {name}(ctx context.Context, client *http.Client, endpoint string) (*{name}Response, error) {{\n"
        ));
        out.push_str(&format!(
            "\tpayload, err := json.Marshal(operationPayload{{Query: {name}Source}})\n"
        ));
    }
    out.push_str("\tif err != nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: marshal payload: %w\", err)\n"
    ));
    out.push_str("\t}\n");
    out.push_str(
        "\treq, err := http.NewRequestWithContext(ctx, http.MethodPost, endpoint, bytes.NewReader(payload))\n",
    );
    out.push_str("\tif err != nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: build request: %w\", err)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\treq.Header.Set(\"Content-Type\", \"application/json\")\n");
    out.push_str("\tresp, err := client.Do(req)\n");
    out.push_str("\tif err != nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: execute request: %w\", err)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\tdefer resp.Body.Close()\n");
    out.push_str("\tbody, err := io.ReadAll(resp.Body)\n");
    out.push_str("\tif err != nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: read response: %w\", err)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\tif resp.StatusCode != http.StatusOK {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: unexpected status %s\", resp.Status)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\tvar decoded struct {\n");
    out.push_str(&format!(
        "\t\tData   *{name}Response `json:\"data\"`\n"
    ));
    out.push_str("\t\tErrors []struct {\n");
    out.push_str("\t\t\tMessage string `json:\"message\"`\n");
    out.push_str("\t\t} `json:\"errors\"`\n");
    out.push_str("\t}\n");
    out.push_str("\tif err := json.Unmarshal(body, &decoded); err != nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: decode response: %w\", err)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\tif len(decoded.Errors) > 0 {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: %s\", decoded.Errors[0].Message)\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\tif decoded.Data == nil {\n");
    out.push_str(&format!(
        "\t\treturn nil, fmt.Errorf(\"{name}: response carried no data\")\n"
    ));
    out.push_str("\t}\n");
    out.push_str("\treturn decoded.Data, nil\n");
    out.push_str("}\n");

    out
}
